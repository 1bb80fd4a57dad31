//! lox_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! Diagnostics are plain values collected while scanning; nothing is printed
//! until a [`Reporter`] renders them against the source they came from.

mod reporter;

pub use reporter::{render, Reporter};

use lox_core::text::Position;
use std::fmt;

/// A diagnostic message template with a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticMessage {
    /// The diagnostic error code (e.g., 1001).
    pub code: u32,
    /// The message text shown after `Error: `.
    pub message: &'static str,
}

/// A realized diagnostic with location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Where the fault was detected.
    pub position: Position,
    /// The resolved message text.
    pub message_text: String,
    /// The diagnostic error code.
    pub code: u32,
}

impl Diagnostic {
    /// Create a diagnostic at the given position.
    pub fn new(message: &DiagnosticMessage, position: Position) -> Self {
        Self {
            position,
            message_text: message.message.to_string(),
            code: message.code,
        }
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] error LX{}: {}",
            self.position, self.code, self.message_text
        )
    }
}

/// A collection of diagnostics accumulated during a scan, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }
}

impl<'a> IntoIterator for &'a DiagnosticCollection {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $msg:expr) => {
            DiagnosticMessage { code: $code, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(1001, "Unexpected character.");
    pub const UNTERMINATED_STRING: DiagnosticMessage = diag!(1002, "Unterminated string.");
    pub const UNTERMINATED_COMMENT: DiagnosticMessage = diag!(1003, "Unterminated comment.");
}
