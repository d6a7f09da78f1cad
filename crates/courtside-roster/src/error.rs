//! Error types for roster decoding and encoding.

use thiserror::Error;

use crate::layout::Field;

/// Errors that can occur when working with roster archives.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed data found while decoding.
    #[error("format error: {0}")]
    Format(#[from] courtside_common::Error),

    /// The buffer is smaller than the layout requires.
    #[error("roster file too small: layout needs {needed:#x} bytes, got {actual:#x}")]
    Truncated { needed: usize, actual: usize },

    /// The layout constants are unusable.
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// An edited row names a conference that is not in the conference table.
    #[error("team {team}: unknown conference {name:?}")]
    UnknownConference { team: usize, name: String },

    /// Original and edited tables differ in length.
    #[error("row count mismatch: decoded {expected} teams, edited table has {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    /// Original and edited rows disagree on whether there is a conference column.
    #[error("team {team}: conference column present in only one of the original and edited rows")]
    FieldCountMismatch { team: usize },

    /// Edited text contains U+0000, which cannot be stored in a terminated heap string.
    #[error("team {team} {field}: text contains an interior NUL")]
    InteriorNul { team: usize, field: Field },

    /// A pointer resolved outside the buffer while encoding.
    #[error("format inconsistency while encoding team {team} {field}: {source}")]
    FormatInconsistency {
        team: usize,
        field: Field,
        #[source]
        source: courtside_common::Error,
    },

    /// No free null run large enough was found before the end of the buffer.
    #[error("string heap exhausted: no free run for {needed} bytes at or after {cursor:#x}")]
    AllocatorExhausted { cursor: usize, needed: usize },
}

/// Coarse classification of [`Error`], matching how callers react to failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// File could not be read or written.
    Io,
    /// The file (or the requested edit) is malformed; nothing was decoded or saved.
    Format,
    /// Pointer arithmetic broke during a save; the save was aborted.
    FormatInconsistency,
    /// The heap has no room left; the save was aborted.
    AllocatorExhausted,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) => ErrorKind::Io,
            Error::FormatInconsistency { .. } => ErrorKind::FormatInconsistency,
            Error::AllocatorExhausted { .. } => ErrorKind::AllocatorExhausted,
            Error::Format(_)
            | Error::Truncated { .. }
            | Error::InvalidLayout(_)
            | Error::UnknownConference { .. }
            | Error::RowCountMismatch { .. }
            | Error::FieldCountMismatch { .. }
            | Error::InteriorNul { .. } => ErrorKind::Format,
        }
    }
}

/// Result type for roster operations.
pub type Result<T> = std::result::Result<T, Error>;
