//! Courtside - College Hoops 2K8 roster archive library.
//!
//! This crate provides a unified interface to the Courtside crates.
//!
//! # Crates
//!
//! - [`courtside_common`] - Big-endian reading, self-relative pointers, UTF-16 heap strings
//! - [`courtside_roster`] - Roster layout, decoding, change detection and heap patching
//! - [`courtside_dump`] - JSON dumps, string scans and CSV tables
//!
//! # Example
//!
//! ```no_run
//! use courtside::prelude::*;
//!
//! let layout = RosterLayout::college_hoops_2k8(RosterFormat::Extended);
//! let (mut roster, original) = courtside::roster::open("USERDATA", layout)?;
//!
//! let mut edited = original.clone();
//! edited[0].set(Field::Conference, "Big East");
//! let report = roster.save("USERDATA", &original, &edited)?;
//! println!("{} pointers re-pointed", report.repointed());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use courtside_common as common;
pub use courtside_dump as dump;
pub use courtside_roster as roster;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use courtside_common::{BinaryReader, HeapString};
    pub use courtside_dump::{RosterDump, ScanOptions, StringScan};
    pub use courtside_roster::{
        EncodeReport, Field, PatchAction, RosterFile, RosterFormat, RosterLayout, TeamRow,
    };
}

// Re-export commonly used types at the crate root
pub use courtside_roster::RosterFile;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
