//! Common utilities for Courtside.
//!
//! This crate provides the foundational pieces shared by every Courtside crate:
//!
//! - [`BinaryReader`] - Bounds-checked big-endian reading from byte slices
//! - [`pointer`] - Self-relative pointer arithmetic used by every record field
//! - [`utf16`] - Null-terminated UTF-16LE heap strings (read and encode)

mod error;
mod reader;

pub mod pointer;
pub mod utf16;

pub use error::{Error, Result};
pub use pointer::{displacement, resolve};
pub use reader::BinaryReader;
pub use utf16::{encode_utf16z, read_utf16z, HeapString};

/// Re-export zerocopy traits for convenience
pub use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

/// Re-export memchr for string pool searches
pub use memchr;
