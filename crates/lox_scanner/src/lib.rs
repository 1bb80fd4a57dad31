//! lox_scanner: Lexer/tokenizer for Lox source code.
//!
//! Produces the full token sequence for a source string together with the
//! lexical diagnostics found along the way:
//! - Single and double character operators
//! - String literals (no escape sequences) and decimal number literals
//! - Keywords and identifiers
//! - Line comments and nesting block comments

mod char_codes;
mod scanner;
mod token;

pub use scanner::{ScanErrorKind, ScanResult, Scanner};
pub use token::{Literal, Token, TokenType};

/// Scan `source` into tokens and diagnostics.
pub fn scan_tokens(source: &str) -> ScanResult {
    Scanner::new(source).scan_tokens()
}
