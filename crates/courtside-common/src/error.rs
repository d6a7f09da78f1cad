//! Error types for courtside-common.

use thiserror::Error;

/// Common error type for Courtside operations.
#[derive(Debug, Error)]
pub enum Error {
    /// End of buffer reached while reading.
    #[error("unexpected end of buffer at {offset:#x}: needed {needed} bytes but only {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A self-relative pointer resolved outside the buffer.
    #[error(
        "pointer at {field_address:#x} (stored {stored:#010x}) resolves to {target:#x}, outside buffer of {len:#x} bytes"
    )]
    PointerOutOfBounds {
        field_address: u32,
        stored: u32,
        target: u32,
        len: usize,
    },

    /// No `0x0000` code unit before the end of the buffer.
    #[error("UTF-16 string at {offset:#x} is missing its null terminator")]
    MissingTerminator { offset: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
