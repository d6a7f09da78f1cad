//! Scan a roster for UTF-16 strings that the decoder does not reach.

use std::hash::BuildHasherDefault;
use std::io::Write;

use courtside_common::utf16::{read_utf16_bounded, TERMINATOR, UNIT_SIZE};
use rustc_hash::FxHasher;
use serde::Serialize;

use crate::dump::RosterDump;
use crate::tabular::quote;
use crate::Result;

type FxHashSet<T> = hashbrown::HashSet<T, BuildHasherDefault<FxHasher>>;

/// Share of printable characters a candidate needs to be reported.
pub const MIN_PRINTABLE_RATIO: f64 = 0.85;

/// Bytes scanned between progress callbacks.
const PROGRESS_STEP: usize = 64 * 1024;

/// Length bounds for reported strings, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 64,
        }
    }
}

/// A candidate string found by the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundString {
    pub offset: u32,
    pub offset_hex: String,
    pub length: usize,
    pub value: String,
}

/// Result of a full scan.
#[derive(Debug, Clone, Serialize)]
pub struct StringScan {
    pub file_length: usize,
    pub strings: Vec<FoundString>,
}

impl StringScan {
    /// Write the scan as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Write the scan as CSV (`offset_hex,length,value`).
    pub fn write_csv<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "offset_hex,length,value")?;
        for found in &self.strings {
            writeln!(
                writer,
                "{},{},{}",
                quote(&found.offset_hex),
                found.length,
                quote(&found.value)
            )?;
        }
        Ok(())
    }
}

/// Strings already accounted for by the decoder.
#[derive(Debug, Clone, Default)]
pub struct KnownStrings {
    strings: FxHashSet<String>,
}

impl KnownStrings {
    pub fn insert(&mut self, value: &str) {
        if !value.is_empty() {
            self.strings.insert(value.to_owned());
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.strings.contains(value)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

impl From<&RosterDump> for KnownStrings {
    fn from(dump: &RosterDump) -> Self {
        let mut known = Self::default();
        for team in &dump.teams {
            for value in [
                &team.team_name,
                &team.team_abbr,
                &team.team_name_2,
                &team.nickname,
                &team.mascot,
            ] {
                known.insert(value);
            }
        }
        for conference in &dump.conferences {
            known.insert(&conference.name);
        }
        known
    }
}

/// Scan `data` for strings that start on a string boundary and are not known.
///
/// A candidate starts at an aligned offset that is either offset 0 or right
/// after a `0x0000` unit. At most `max_len + 1` units are read, so overlong
/// runs fall outside the length bounds and are dropped. `progress` receives
/// `(scanned_bytes, total_bytes)` as the scan advances.
pub fn scan_strings(
    data: &[u8],
    known: &KnownStrings,
    options: ScanOptions,
    mut progress: impl FnMut(usize, usize),
) -> StringScan {
    let max_bytes = (options.max_len + 1) * UNIT_SIZE;
    let mut strings = Vec::new();

    for offset in (0..data.len().saturating_sub(1)).step_by(UNIT_SIZE) {
        if offset % PROGRESS_STEP == 0 {
            progress(offset, data.len());
        }
        if data[offset..offset + UNIT_SIZE] == TERMINATOR {
            continue;
        }
        if offset > 0 && data[offset - UNIT_SIZE..offset] != TERMINATOR {
            continue;
        }

        let value = read_utf16_bounded(data, offset, max_bytes);
        let length = value.chars().count();
        if length < options.min_len || length > options.max_len {
            continue;
        }
        if known.contains(&value) || !is_printable(&value) {
            continue;
        }

        strings.push(FoundString {
            offset: offset as u32,
            offset_hex: format!("{offset:#x}"),
            length,
            value,
        });
    }

    progress(data.len(), data.len());
    tracing::debug!("String scan found {} candidates", strings.len());

    StringScan {
        file_length: data.len(),
        strings,
    }
}

/// Whether at least [`MIN_PRINTABLE_RATIO`] of the characters are printable.
fn is_printable(value: &str) -> bool {
    let total = value.chars().count();
    if total == 0 {
        return false;
    }
    let printable = value.chars().filter(|c| !c.is_control()).count();
    printable as f64 / total as f64 >= MIN_PRINTABLE_RATIO
}
