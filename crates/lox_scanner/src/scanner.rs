//! The Lox scanner.
//!
//! Converts a whole source string into tokens in a single pass. Malformed
//! input never stops the scan: each fault becomes a diagnostic and scanning
//! resumes with the next character, so one pass finds every lexical error.

use std::fmt;

use crate::char_codes::*;
use crate::token::{Literal, Token, TokenType};
use lox_core::text::{Position, TextSpan};
use lox_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};

/// The lexical errors the scanner can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedComment,
}

impl ScanErrorKind {
    pub fn message(self) -> &'static DiagnosticMessage {
        match self {
            ScanErrorKind::UnexpectedCharacter => &messages::UNEXPECTED_CHARACTER,
            ScanErrorKind::UnterminatedString => &messages::UNTERMINATED_STRING,
            ScanErrorKind::UnterminatedComment => &messages::UNTERMINATED_COMMENT,
        }
    }

    /// Classify a diagnostic produced by the scanner.
    pub fn from_code(code: u32) -> Option<ScanErrorKind> {
        [
            ScanErrorKind::UnexpectedCharacter,
            ScanErrorKind::UnterminatedString,
            ScanErrorKind::UnterminatedComment,
        ]
        .into_iter()
        .find(|kind| kind.message().code == code)
    }
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().message)
    }
}

/// Everything one scan produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    /// The tokens in source order, always ending with a single `EOF`.
    pub tokens: Vec<Token>,
    /// Lexical errors in the order they were found.
    pub diagnostics: DiagnosticCollection,
}

impl ScanResult {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Error kinds in discovery order.
    pub fn error_kinds(&self) -> Vec<ScanErrorKind> {
        self.diagnostics
            .iter()
            .filter_map(|d| ScanErrorKind::from_code(d.code))
            .collect()
    }
}

/// The scanner converts Lox source text into tokens.
///
/// A scanner covers exactly one source string and is consumed by
/// [`Scanner::scan_tokens`].
pub struct Scanner {
    /// The source text being scanned.
    text: Vec<char>,
    /// Start of the lexeme being scanned.
    start: usize,
    /// Next unread character.
    current: usize,
    /// 1-based line of the next unread character.
    line: u32,
    /// 0-based column of the next unread character.
    column: u32,
    /// Line and column where the current lexeme starts.
    start_line: u32,
    start_column: u32,
    tokens: Vec<Token>,
    diagnostics: DiagnosticCollection,
}

impl Scanner {
    /// Create a new scanner for the given source text.
    pub fn new(source: &str) -> Self {
        Self {
            text: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            column: 0,
            start_line: 1,
            start_column: 0,
            tokens: Vec::new(),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Scan the whole source.
    pub fn scan_tokens(mut self) -> ScanResult {
        let _span = tracing::debug_span!("scan_tokens", chars = self.text.len()).entered();

        while !self.is_at_end() {
            self.begin_lexeme();
            self.scan_token();
        }

        self.begin_lexeme();
        self.add_token(TokenType::Eof);

        tracing::debug!(
            tokens = self.tokens.len(),
            errors = self.diagnostics.len(),
            "scan finished"
        );
        ScanResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
        }
    }

    // ========================================================================
    // Core scanning
    // ========================================================================

    fn begin_lexeme(&mut self) {
        self.start = self.current;
        self.start_line = self.line;
        self.start_column = self.column;
    }

    fn scan_token(&mut self) {
        let ch = self.advance();
        match ch {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),

            '!' => self.add_either('=', TokenType::BangEqual, TokenType::Bang),
            '=' => self.add_either('=', TokenType::EqualEqual, TokenType::Equal),
            '<' => self.add_either('=', TokenType::LessEqual, TokenType::Less),
            '>' => self.add_either('=', TokenType::GreaterEqual, TokenType::Greater),

            '/' => {
                if self.match_char('/') {
                    self.skip_line_comment();
                } else if self.match_char('*') {
                    self.skip_block_comment();
                } else {
                    self.add_token(TokenType::Slash);
                }
            }

            // `advance` already moved to the next line.
            LINE_FEED => {}
            c if is_blank(c) => {}

            '"' => self.scan_string(),
            c if is_digit(c) => self.scan_number(),
            c if is_alpha(c) => self.scan_identifier(),

            _ => {
                let at = Position::new(self.start_line, self.start_column);
                self.error(ScanErrorKind::UnexpectedCharacter, at);
            }
        }
    }

    /// Emit `matched` if the next character is `expected`, else `single`.
    fn add_either(&mut self, expected: char, matched: TokenType, single: TokenType) {
        let kind = if self.match_char(expected) { matched } else { single };
        self.add_token(kind);
    }

    fn skip_line_comment(&mut self) {
        while self.peek().map_or(false, |ch| ch != LINE_FEED) {
            self.advance();
        }
    }

    /// Skip a `/* ... */` comment whose opener was already consumed.
    /// Comments nest; only the depth matters.
    fn skip_block_comment(&mut self) {
        let mut depth: u32 = 1;
        while depth > 0 {
            match (self.peek(), self.peek_next()) {
                (None, _) => break,
                (Some('*'), Some('/')) => {
                    self.advance();
                    self.advance();
                    depth -= 1;
                }
                (Some('/'), Some('*')) => {
                    self.advance();
                    self.advance();
                    depth += 1;
                    tracing::trace!(depth, "nested block comment");
                }
                _ => {
                    self.advance();
                }
            }
        }

        if depth > 0 {
            self.error(ScanErrorKind::UnterminatedComment, self.position());
        }
    }

    fn scan_string(&mut self) {
        while self.peek().map_or(false, |ch| ch != '"') {
            self.advance();
        }

        if self.is_at_end() {
            self.error(ScanErrorKind::UnterminatedString, self.position());
            return;
        }

        // closing quote
        self.advance();

        let value = self.chars_to_string(self.start + 1, self.current - 1);
        self.add_literal_token(TokenType::String, Literal::String(value));
    }

    fn scan_number(&mut self) {
        self.skip_digits();

        // A dot only belongs to the number when a digit follows it, so
        // `123.method` stays NUMBER DOT IDENTIFIER.
        if self.peek() == Some('.') && self.peek_next().map_or(false, is_digit) {
            self.advance();
            self.skip_digits();
        }

        // Digits with an optional fraction always parse.
        let value = self.lexeme().parse::<f64>().unwrap_or_default();
        self.add_literal_token(TokenType::Number, Literal::Number(value));
    }

    fn skip_digits(&mut self) {
        while self.peek().map_or(false, is_digit) {
            self.advance();
        }
    }

    fn scan_identifier(&mut self) {
        while self.peek().map_or(false, is_alpha_numeric) {
            self.advance();
        }

        let kind = TokenType::from_keyword(&self.lexeme()).unwrap_or(TokenType::Identifier);
        self.add_token(kind);
    }

    // ========================================================================
    // Cursor
    // ========================================================================

    /// Whether we've reached the end of the text.
    #[inline]
    fn is_at_end(&self) -> bool {
        self.current >= self.text.len()
    }

    /// Look at the next unread character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.text.get(self.current).copied()
    }

    /// Look one character past [`Scanner::peek`].
    #[inline]
    fn peek_next(&self) -> Option<char> {
        self.text.get(self.current + 1).copied()
    }

    /// Consume one character. Only called when not at the end.
    fn advance(&mut self) -> char {
        let ch = self.text[self.current];
        self.current += 1;
        if ch == LINE_FEED {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
        ch
    }

    /// Consume the next character only if it is `expected`.
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() != Some(expected) {
            return false;
        }
        self.advance();
        true
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    // ========================================================================
    // Output
    // ========================================================================

    fn add_token(&mut self, kind: TokenType) {
        let token = self.make_token(kind);
        self.tokens.push(token);
    }

    fn add_literal_token(&mut self, kind: TokenType, literal: Literal) {
        let token = self.make_token(kind).with_literal(literal);
        self.tokens.push(token);
    }

    fn make_token(&self, kind: TokenType) -> Token {
        Token::new(
            kind,
            self.lexeme(),
            self.start_line,
            self.start_column,
            TextSpan::from_bounds(self.start as u32, self.current as u32),
        )
    }

    fn error(&mut self, kind: ScanErrorKind, at: Position) {
        tracing::debug!(error = %kind, position = %at, "lexical error");
        self.diagnostics.add(Diagnostic::new(kind.message(), at));
    }

    fn lexeme(&self) -> String {
        self.chars_to_string(self.start, self.current)
    }

    /// Convert a range of chars to a String.
    fn chars_to_string(&self, start: usize, end: usize) -> String {
        self.text[start..end].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenType> {
        Scanner::new(source)
            .scan_tokens()
            .tokens
            .iter()
            .map(|t| t.token_type)
            .collect()
    }

    #[test]
    fn test_scan_simple_tokens() {
        assert_eq!(
            kinds("(){},.-+;*/"),
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::Comma,
                TokenType::Dot,
                TokenType::Minus,
                TokenType::Plus,
                TokenType::Semicolon,
                TokenType::Star,
                TokenType::Slash,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_scan_one_or_two_character_operators() {
        assert_eq!(
            kinds("! != = == < <= > >="),
            vec![
                TokenType::Bang,
                TokenType::BangEqual,
                TokenType::Equal,
                TokenType::EqualEqual,
                TokenType::Less,
                TokenType::LessEqual,
                TokenType::Greater,
                TokenType::GreaterEqual,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_operator_at_end_of_input() {
        assert_eq!(kinds("!"), vec![TokenType::Bang, TokenType::Eof]);
        assert_eq!(kinds("/"), vec![TokenType::Slash, TokenType::Eof]);
    }

    #[test]
    fn test_cursor_columns_restart_after_newline() {
        let result = Scanner::new("ab\ncd e").scan_tokens();
        let positions: Vec<(u32, u32)> = result
            .tokens
            .iter()
            .map(|t| (t.line, t.start_column))
            .collect();
        assert_eq!(positions, vec![(1, 0), (2, 0), (2, 3), (2, 4)]);
    }

    #[test]
    fn test_spans_cover_lexemes() {
        let result = Scanner::new("var abc").scan_tokens();
        assert_eq!(result.tokens[0].span, TextSpan::new(0, 3));
        assert_eq!(result.tokens[1].span, TextSpan::new(4, 3));
        assert!(result.tokens[2].span.is_empty());
        assert_eq!(result.tokens[2].span.start, 7);
    }

    #[test]
    fn test_error_kind_from_code() {
        assert_eq!(
            ScanErrorKind::from_code(1002),
            Some(ScanErrorKind::UnterminatedString)
        );
        assert_eq!(ScanErrorKind::from_code(42), None);
        assert_eq!(
            ScanErrorKind::UnterminatedComment.to_string(),
            "Unterminated comment."
        );
    }
}
