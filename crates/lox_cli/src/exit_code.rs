use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit codes for the `lox` CLI, following the BSD `sysexits` convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Bad command-line usage
    Usage = 64,
    /// The input had lexical errors
    DataError = 65,
    /// A file or stream could not be read or written
    IoError = 74,
}

impl ExitCode {
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.code())
    }
}

/// Failures of the driver itself, as opposed to errors in the scanned input.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read input: {0}")]
    Input(#[source] io::Error),

    #[error("could not write output: {0}")]
    Output(#[source] io::Error),

    #[error("could not encode tokens: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<&CliError> for ExitCode {
    fn from(error: &CliError) -> Self {
        match error {
            CliError::Usage(_) => ExitCode::Usage,
            CliError::Read { .. }
            | CliError::Input(_)
            | CliError::Output(_)
            | CliError::Json(_) => ExitCode::IoError,
        }
    }
}
