//! Structured dump of a roster with pointer metadata.

use std::io::Write;

use courtside_roster::{Conference, Field, FieldPointer, RosterFile, TeamRecord};
use serde::Serialize;

use crate::Result;

/// Bytes per line of `block_hex`.
pub const HEX_LINE_WIDTH: usize = 16;

/// Everything decoded from a roster, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct RosterDump {
    pub file_length: usize,
    pub teams: Vec<TeamDump>,
    pub conferences: Vec<ConferenceDump>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamDump {
    pub index: usize,
    pub offset: u32,
    pub offset_hex: String,
    pub team_name: String,
    pub team_abbr: String,
    pub team_name_2: String,
    pub nickname: String,
    pub mascot: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    pub pointers: Vec<PointerDump>,
    /// The raw record, hex encoded in lines of [`HEX_LINE_WIDTH`] bytes.
    pub block_hex: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PointerDump {
    pub slot: u32,
    pub pointer_offset: u32,
    pub pointer_value: u32,
    pub string_pointer: u32,
}

impl PointerDump {
    fn new(slot: u32, pointer: &FieldPointer) -> Self {
        Self {
            slot,
            pointer_offset: pointer.field_address,
            pointer_value: pointer.stored,
            string_pointer: pointer.target,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ConferenceDump {
    pub offset: u32,
    pub offset_hex: String,
    pub name: String,
    pub name_pointer: u32,
}

impl RosterDump {
    /// Decode `roster` into a dump.
    pub fn build(roster: &RosterFile) -> Result<Self> {
        // The conference table is dumped in both formats.
        let conferences = roster.conferences()?;
        let records = roster.team_records()?;

        Ok(Self {
            file_length: roster.len(),
            teams: records
                .iter()
                .map(|record| team_dump(roster, record))
                .collect(),
            conferences: conferences.iter().map(conference_dump).collect(),
        })
    }

    /// Write the dump as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

fn team_dump(roster: &RosterFile, record: &TeamRecord) -> TeamDump {
    let row = record.row();

    let mut pointers: Vec<PointerDump> = record
        .fields
        .iter()
        .map(|decoded| PointerDump::new(decoded.field.slot(), &decoded.pointer))
        .collect();
    if let Some(link) = &record.conference {
        pointers.push(PointerDump::new(Field::Conference.slot(), &link.pointer));
    }

    let start = record.offset as usize;
    let end = (start + roster.layout().teams.stride as usize).min(roster.len());

    TeamDump {
        index: record.index,
        offset: record.offset,
        offset_hex: format!("{:#x}", record.offset),
        team_name: row.team_name,
        team_abbr: row.abbreviation,
        team_name_2: row.secondary_name,
        nickname: row.nickname,
        mascot: row.mascot,
        conference: row.conference,
        pointers,
        block_hex: hex_lines(&roster.data()[start..end]),
    }
}

fn conference_dump(conference: &Conference) -> ConferenceDump {
    ConferenceDump {
        offset: conference.offset,
        offset_hex: format!("{:#x}", conference.offset),
        name: conference.name.text.clone(),
        name_pointer: conference.pointer.target,
    }
}

/// Hex encode `bytes` in lines of [`HEX_LINE_WIDTH`] bytes.
pub fn hex_lines(bytes: &[u8]) -> Vec<String> {
    bytes.chunks(HEX_LINE_WIDTH).map(hex::encode).collect()
}
