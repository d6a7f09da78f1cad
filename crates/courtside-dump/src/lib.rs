//! Read-only inspection of roster archives.
//!
//! - [`RosterDump`]: every team and conference with its pointer metadata and
//!   a hex view of each team record, serialized as JSON
//! - [`scan_strings`]: heap strings that no decoded pointer reaches
//! - [`tabular`]: CSV tables of teams and conferences, and the team table reader
//!   used to import edits

mod error;
pub mod dump;
pub mod scan;
pub mod tabular;

pub use dump::{ConferenceDump, PointerDump, RosterDump, TeamDump};
pub use error::{Error, Result};
pub use scan::{scan_strings, FoundString, KnownStrings, ScanOptions, StringScan};
pub use tabular::{read_team_table, write_conference_table, write_team_table};
