//! Roster file handling.

use std::fs;
use std::io::Write;
use std::path::Path;

use courtside_common::BinaryReader;
use tempfile::NamedTempFile;

use crate::decode::{decode_conferences, decode_team_records, Conference, TeamRecord, TeamRow};
use crate::encode::{encode, EncodeReport};
use crate::layout::RosterLayout;
use crate::{Error, Result};

/// Size of the big-endian length header at offset 0.
pub const HEADER_SIZE: usize = 4;

/// An open roster archive.
///
/// The whole file is held in memory. Saving never touches this buffer until
/// the patched copy has been written to disk in full.
#[derive(Debug, Clone)]
pub struct RosterFile {
    data: Vec<u8>,
    layout: RosterLayout,
}

impl RosterFile {
    /// Read a roster file from disk.
    pub fn open<P: AsRef<Path>>(path: P, layout: RosterLayout) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        tracing::info!("Opened {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(data, layout)
    }

    /// Wrap an in-memory roster image.
    pub fn from_bytes(data: Vec<u8>, layout: RosterLayout) -> Result<Self> {
        layout.validate()?;

        if data.len() < layout.required_len().max(HEADER_SIZE) {
            return Err(Error::Truncated {
                needed: layout.required_len().max(HEADER_SIZE),
                actual: data.len(),
            });
        }

        let declared = BinaryReader::new(&data).read_u32()? as usize;
        if declared != data.len() {
            tracing::warn!(
                "Header declares {:#x} bytes but file is {:#x} bytes",
                declared,
                data.len()
            );
        }

        Ok(Self { data, layout })
    }

    /// Get the raw file bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the file, returning its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn layout(&self) -> &RosterLayout {
        &self.layout
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Length declared by the file header.
    pub fn declared_len(&self) -> u32 {
        BinaryReader::new(&self.data).read_u32().unwrap_or_default()
    }

    /// Decode the conference table.
    pub fn conferences(&self) -> Result<Vec<Conference>> {
        decode_conferences(&self.data, &self.layout)
    }

    /// Decode every team record with pointer metadata.
    pub fn team_records(&self) -> Result<Vec<TeamRecord>> {
        let conferences = self.conferences_if_used()?;
        decode_team_records(&self.data, &self.layout, &conferences)
    }

    /// Decode the team table into editable rows.
    pub fn teams(&self) -> Result<Vec<TeamRow>> {
        let conferences = self.conferences_if_used()?;
        let records = decode_team_records(&self.data, &self.layout, &conferences)?;
        Ok(records.iter().map(TeamRecord::row).collect())
    }

    /// Encode edits into a patched copy of the file without modifying `self`.
    pub fn encode(
        &self,
        original: &[TeamRow],
        edited: &[TeamRow],
    ) -> Result<(Vec<u8>, EncodeReport)> {
        let conferences = self.conferences_if_used()?;
        encode(&self.data, &self.layout, &conferences, original, edited)
    }

    /// Encode edits and adopt the patched buffer on success.
    pub fn apply(&mut self, original: &[TeamRow], edited: &[TeamRow]) -> Result<EncodeReport> {
        let (staged, report) = self.encode(original, edited)?;
        self.data = staged;
        Ok(report)
    }

    /// Encode edits and write the result to `path`.
    ///
    /// The file at `path` is replaced atomically; on any failure it is left
    /// as it was and `self` is unchanged.
    pub fn save<P: AsRef<Path>>(
        &mut self,
        path: P,
        original: &[TeamRow],
        edited: &[TeamRow],
    ) -> Result<EncodeReport> {
        let path = path.as_ref();
        let (staged, report) = self.encode(original, edited)?;
        persist(path, &staged)?;
        self.data = staged;

        tracing::info!(
            "Saved {}: {} interned, {} in place, {} relocated, {} re-pointed",
            path.display(),
            report.interned(),
            report.in_place(),
            report.relocated(),
            report.repointed()
        );
        Ok(report)
    }

    /// Write the current buffer to `path` atomically.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persist(path.as_ref(), &self.data)
    }

    fn conferences_if_used(&self) -> Result<Vec<Conference>> {
        if self.layout.has_conferences() {
            self.conferences()
        } else {
            Ok(Vec::new())
        }
    }
}

/// Open `path` and decode its team rows.
pub fn open<P: AsRef<Path>>(path: P, layout: RosterLayout) -> Result<(RosterFile, Vec<TeamRow>)> {
    let file = RosterFile::open(path, layout)?;
    let rows = file.teams()?;
    Ok((file, rows))
}

/// Re-encode `edited` over the file at `path` and replace it.
pub fn save<P: AsRef<Path>>(
    path: P,
    layout: RosterLayout,
    original: &[TeamRow],
    edited: &[TeamRow],
) -> Result<EncodeReport> {
    let path = path.as_ref();
    RosterFile::open(path, layout)?.save(path, original, edited)
}

/// Write `bytes` to a temporary file next to `path`, then rename it over `path`.
fn persist(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staging = NamedTempFile::new_in(dir)?;
    staging.write_all(bytes)?;
    staging.as_file().sync_all()?;
    staging.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_buffer() {
        let layout = RosterLayout::default();
        let result = RosterFile::from_bytes(vec![0u8; 16], layout);
        assert!(matches!(result, Err(Error::Truncated { actual: 16, .. })));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        let mut layout = RosterLayout::default();
        layout.conferences.stride = 0;
        assert!(matches!(
            RosterFile::from_bytes(vec![0u8; 16], layout),
            Err(Error::InvalidLayout(_))
        ));
    }
}
