//! Error types for roster dumps and tables.

use thiserror::Error;

/// Errors that can occur while exporting or importing roster data.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Roster decoding error.
    #[error("{0}")]
    Roster(#[from] courtside_roster::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed CSV input.
    #[error("line {line}: {message}")]
    Tabular { line: usize, message: String },
}

impl Error {
    pub(crate) fn tabular(line: usize, message: impl Into<String>) -> Self {
        Self::Tabular {
            line,
            message: message.into(),
        }
    }
}

/// Result type for dump operations.
pub type Result<T> = std::result::Result<T, Error>;
