//! Roster archive codec for College Hoops 2K8 `USERDATA` files.
//!
//! A roster archive is a fixed-size file holding arrays of fixed-size team
//! and conference records. Records do not store text inline; each text field
//! is a 4-byte big-endian displacement, measured from the field's own
//! address, into a shared heap of null-terminated UTF-16LE strings.
//!
//! # File Format
//!
//! - 4 bytes: big-endian file length
//! - Team table at `0x1D8614..0x224860`, `0x2C0` bytes per team:
//!   - slots 0-4: team name, abbreviation, secondary name, nickname, mascot
//!   - slot 6 (byte 24, extended format): conference pointer
//! - Conference table at `0x34597C..0x361198`, `0xB94` bytes per conference,
//!   name pointer at slot 0
//! - String pool from `0x362CF8`; new strings are allocated from `0x3CBFE0`
//!
//! # Saving
//!
//! The file never grows. Each edited field is written by re-pointing at an
//! identical existing string, overwriting the old string in place, or placing
//! the new string in free null padding (see [`encode`]). Edits are staged on a
//! copy and the file on disk is replaced only when every edit succeeded.
//!
//! # Example
//!
//! ```no_run
//! use courtside_roster::{Field, RosterFile, RosterFormat, RosterLayout};
//!
//! let layout = RosterLayout::college_hoops_2k8(RosterFormat::Extended);
//! let mut roster = RosterFile::open("USERDATA", layout)?;
//!
//! let original = roster.teams()?;
//! let mut edited = original.clone();
//! edited[0].set(Field::Nickname, "Blue Devils");
//!
//! let report = roster.save("USERDATA", &original, &edited)?;
//! println!("{} strings relocated", report.relocated());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod file;
pub mod allocator;
pub mod decode;
pub mod diff;
pub mod encode;
pub mod layout;
pub mod pool;
pub mod record;

pub use error::{Error, ErrorKind, Result};
pub use file::{open, save, RosterFile, HEADER_SIZE};

// Re-export commonly used types at crate root
pub use allocator::{Allocation, BumpAllocator};
pub use decode::{decode_conferences, decode_teams, Conference, TeamRecord, TeamRow};
pub use diff::{diff, FieldChange};
pub use encode::{EncodeReport, Patch, PatchAction};
pub use layout::{ConferenceAnchor, Field, RosterFormat, RosterLayout, TableLayout};
pub use record::FieldPointer;
