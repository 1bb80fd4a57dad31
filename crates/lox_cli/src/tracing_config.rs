//! Tracing configuration.
//!
//! Output format is controlled by `LOX_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `json`: one JSON object per event
//!
//! ```bash
//! LOX_LOG=debug lox script.lox
//! LOX_LOG=lox_scanner=trace LOX_LOG_FORMAT=json lox script.lox
//! ```
//!
//! The subscriber is only initialised when `LOX_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Parse from the `LOX_LOG_FORMAT` environment variable.
    fn from_env() -> Self {
        Self::parse(&std::env::var("LOX_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `LOX_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    match std::env::var("LOX_LOG") {
        Ok(val) => EnvFilter::builder().parse_lossy(val),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Initialise the global tracing subscriber.
///
/// All output goes to stderr so it never mixes with printed tokens.
pub fn init_tracing() {
    let has_lox_log = std::env::var("LOX_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_lox_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
