//! Character classes recognised by the scanner.
//!
//! Lox source is ASCII at the lexical level: anything outside these classes
//! (including non-ASCII letters) is an unexpected character.

pub const LINE_FEED: char = '\n';

/// Check if a character is a decimal digit.
#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if a character can start an identifier.
#[inline]
pub fn is_alpha(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Check if a character can continue an identifier.
#[inline]
pub fn is_alpha_numeric(ch: char) -> bool {
    is_alpha(ch) || is_digit(ch)
}

/// Whitespace skipped between tokens. Line feeds are handled separately.
#[inline]
pub fn is_blank(ch: char) -> bool {
    matches!(ch, ' ' | '\r' | '\t')
}
