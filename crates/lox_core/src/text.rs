//! Source positions, lexeme spans and line lookup.
//!
//! Lines are 1-based and columns are 0-based, both counted in `char`s. These
//! are the coordinates carried by tokens and diagnostics, and the ones the
//! caret renderer expects.

use std::fmt;

use memchr::memchr_iter;

/// A location in source text.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Position {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, in characters.
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A span in source text, defined by a start offset and a length.
///
/// Offsets count characters from the start of the source, not bytes.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    /// The character offset where this span starts.
    pub start: u32,
    /// The length of this span in characters.
    pub length: u32,
}

impl TextSpan {
    /// Create a new text span.
    #[inline]
    pub fn new(start: u32, length: u32) -> Self {
        Self { start, length }
    }

    /// Create a span from start and end offsets.
    #[inline]
    pub fn from_bounds(start: u32, end: u32) -> Self {
        debug_assert!(end >= start);
        Self {
            start,
            length: end - start,
        }
    }

    /// The end offset of this span (exclusive).
    #[inline]
    pub fn end(&self) -> u32 {
        self.start + self.length
    }

    /// Whether this span is empty (zero-length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end())
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// Return the text of the 1-based `line` of `source`, without its newline.
///
/// Line 1 is everything before the first `\n`; line `n` is the text between
/// the `(n-1)`-th and the `n`-th `\n` (or the end of input). Line 0 and lines
/// past the last newline yield an empty string. A trailing `\r` is dropped so
/// CRLF sources render the same as LF ones.
pub fn line_content(source: &str, line: u32) -> &str {
    if line == 0 {
        return "";
    }

    let bytes = source.as_bytes();
    let start = if line == 1 {
        0
    } else {
        match memchr_iter(b'\n', bytes).nth(line as usize - 2) {
            Some(newline) => newline + 1,
            None => return "",
        }
    };

    let end = memchr::memchr(b'\n', &bytes[start..])
        .map(|offset| start + offset)
        .unwrap_or(bytes.len());

    let text = &source[start..end];
    text.strip_suffix('\r').unwrap_or(text)
}
