//! Human-facing rendering of diagnostics.
//!
//! A report quotes the offending source line and points a caret at the
//! column where the problem was found:
//!
//! ```text
//! Error: Unexpected character.
//!
//!     1 | function(a, b@);
//!                      ^--Here.
//! ```
//!
//! Columns are 0-based, so the caret is indented by the width of the
//! `    1 | ` gutter plus the column.

use std::io::Write;

use lox_core::text::line_content;

use crate::{Diagnostic, DiagnosticCollection};

const OFFSET: &str = "    ";
const SEPARATOR: &str = " | ";

/// Render one report for `message` at `line`/`column` of `source`.
///
/// Lines that do not exist in `source` are quoted as empty.
pub fn render(line: u32, column: u32, source: &str, message: &str) -> String {
    let gutter = format!("{}{}{}", OFFSET, line, SEPARATOR);
    let caret_offset = gutter.len() + column as usize;
    format!(
        "Error: {}\n\n{}{}\n{}^--Here.\n",
        message,
        gutter,
        line_content(source, line),
        " ".repeat(caret_offset)
    )
}

/// Writes reports to a stream and remembers whether any were written.
///
/// The error state belongs to whoever owns the reporter: a file run checks
/// [`Reporter::had_error`] once at the end, a REPL calls
/// [`Reporter::reset`] before every line.
pub struct Reporter<W: Write> {
    out: W,
    error_count: usize,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            error_count: 0,
        }
    }

    /// Report `message` at `line`/`column` of `source`.
    ///
    /// Never fails: a stream that cannot be written to is logged and the
    /// error is still counted.
    pub fn report(&mut self, line: u32, column: u32, source: &str, message: &str) {
        let text = render(line, column, source, message);
        if let Err(err) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::warn!(%err, "failed to write diagnostic");
        }
        self.error_count += 1;
    }

    pub fn report_diagnostic(&mut self, diagnostic: &Diagnostic, source: &str) {
        tracing::debug!(%diagnostic, "reporting diagnostic");
        self.report(
            diagnostic.line(),
            diagnostic.column(),
            source,
            &diagnostic.message_text,
        );
    }

    /// Report every diagnostic in discovery order.
    pub fn report_all(&mut self, diagnostics: &DiagnosticCollection, source: &str) {
        for diagnostic in diagnostics {
            self.report_diagnostic(diagnostic, source);
        }
    }

    pub fn had_error(&self) -> bool {
        self.error_count > 0
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// Clear the error state.
    pub fn reset(&mut self) {
        self.error_count = 0;
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
