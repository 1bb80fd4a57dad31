//! lox_core: Core text utilities for the Lox toolchain.
//!
//! Provides source positions, lexeme spans, and line lookup used by the
//! scanner and the diagnostics renderer.

pub mod text;

// Re-export commonly used types
pub use text::{line_content, Position, TextSpan};
