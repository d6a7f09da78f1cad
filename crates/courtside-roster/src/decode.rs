//! Record table decoding.
//!
//! Decoding walks the team table one stride at a time. Every text field goes
//! through the same steps: compute the field address from the record base and
//! slot, read the stored displacement, resolve it, and read the heap string at
//! the target. Decoding never mutates the buffer.

use courtside_common::{read_utf16z, HeapString};

use crate::layout::{Field, RosterLayout};
use crate::record::{FieldPointer, PointerSlots};
use crate::Result;

/// The editable text of one team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamRow {
    pub team_name: String,
    pub abbreviation: String,
    pub secondary_name: String,
    pub nickname: String,
    pub mascot: String,
    /// Conference name; only present in the extended format.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub conference: Option<String>,
}

impl TeamRow {
    /// Text of `field`, or `None` for an absent conference column.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::TeamName => Some(&self.team_name),
            Field::Abbreviation => Some(&self.abbreviation),
            Field::SecondaryName => Some(&self.secondary_name),
            Field::Nickname => Some(&self.nickname),
            Field::Mascot => Some(&self.mascot),
            Field::Conference => self.conference.as_deref(),
        }
    }

    /// Replace the text of `field`.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::TeamName => self.team_name = value,
            Field::Abbreviation => self.abbreviation = value,
            Field::SecondaryName => self.secondary_name = value,
            Field::Nickname => self.nickname = value,
            Field::Mascot => self.mascot = value,
            Field::Conference => self.conference = Some(value),
        }
    }

    /// The five text fields in column order.
    pub fn text_fields(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::TEXT.into_iter().filter_map(move |field| self.get(field).map(|text| (field, text)))
    }
}

/// A text field decoded together with its pointer metadata.
#[derive(Debug, Clone)]
pub struct DecodedField {
    pub field: Field,
    pub pointer: FieldPointer,
    pub string: HeapString,
}

/// A team's resolved conference pointer.
#[derive(Debug, Clone)]
pub struct ConferenceLink {
    pub pointer: FieldPointer,
    /// Index into the conference table, when the target names a known conference.
    pub conference: Option<usize>,
    /// Conference name shown for the team.
    pub name: String,
}

/// A decoded team record.
#[derive(Debug, Clone)]
pub struct TeamRecord {
    pub index: usize,
    /// Offset of the record in the file.
    pub offset: u32,
    pub fields: Vec<DecodedField>,
    pub conference: Option<ConferenceLink>,
}

impl TeamRecord {
    /// Build the editable row for this record.
    pub fn row(&self) -> TeamRow {
        let mut row = TeamRow::default();
        for decoded in &self.fields {
            row.set(decoded.field, decoded.string.text.clone());
        }
        row.conference = self.conference.as_ref().map(|link| link.name.clone());
        row
    }
}

/// A decoded conference record.
#[derive(Debug, Clone)]
pub struct Conference {
    pub index: usize,
    /// Offset of the record in the file.
    pub offset: u32,
    pub pointer: FieldPointer,
    pub name: HeapString,
}

/// Decode every conference record.
pub fn decode_conferences(data: &[u8], layout: &RosterLayout) -> Result<Vec<Conference>> {
    layout.validate()?;
    layout
        .conferences
        .bases()
        .enumerate()
        .map(|(index, offset)| -> Result<Conference> {
            let pointer = FieldPointer::read(data, offset, 0)?;
            let name = read_utf16z(data, pointer.target)?;
            Ok(Conference {
                index,
                offset,
                pointer,
                name,
            })
        })
        .collect()
}

/// Decode every team record with full pointer metadata.
///
/// `conferences` is only consulted in the extended format.
pub fn decode_team_records(
    data: &[u8],
    layout: &RosterLayout,
    conferences: &[Conference],
) -> Result<Vec<TeamRecord>> {
    layout.validate()?;
    let mut records = Vec::with_capacity(layout.teams.count());

    for (index, offset) in layout.teams.bases().enumerate() {
        let slots = PointerSlots::at(data, offset)?;

        let mut fields = Vec::with_capacity(Field::TEXT.len());
        for field in Field::TEXT {
            let field_address = layout.field_address(index, field);
            let pointer = FieldPointer::from_stored(
                field_address,
                field_address,
                slots.stored(field.slot()),
                data.len(),
            )?;
            let string = read_utf16z(data, pointer.target)?;
            fields.push(DecodedField {
                field,
                pointer,
                string,
            });
        }

        let conference = if layout.has_conferences() {
            let pointer = FieldPointer::from_stored(
                layout.field_address(index, Field::Conference),
                layout.conference_anchor(index),
                slots.stored(Field::Conference.slot()),
                data.len(),
            )?;
            Some(conference_link(data, layout, conferences, pointer)?)
        } else {
            None
        };

        records.push(TeamRecord {
            index,
            offset,
            fields,
            conference,
        });
    }

    Ok(records)
}

/// Decode the team table into editable rows.
pub fn decode_teams(data: &[u8], layout: &RosterLayout) -> Result<Vec<TeamRow>> {
    let conferences = if layout.has_conferences() {
        decode_conferences(data, layout)?
    } else {
        Vec::new()
    };
    let records = decode_team_records(data, layout, &conferences)?;
    Ok(records.iter().map(TeamRecord::row).collect())
}

/// Resolve what a conference pointer lands on.
///
/// A conference record start names that conference. Any other target is read
/// as a heap string and matched to the conference table by text.
fn conference_link(
    data: &[u8],
    layout: &RosterLayout,
    conferences: &[Conference],
    pointer: FieldPointer,
) -> Result<ConferenceLink> {
    if let Some(conference) = layout
        .conferences
        .index_of(pointer.target)
        .and_then(|index| conferences.get(index))
    {
        return Ok(ConferenceLink {
            pointer,
            conference: Some(conference.index),
            name: conference.name.text.clone(),
        });
    }

    let name = read_utf16z(data, pointer.target)?.text;
    let conference = conferences
        .iter()
        .position(|conference| conference.name.text == name);
    if conference.is_none() {
        tracing::debug!(offset = pointer.target, %name, "conference pointer names no conference record");
    }
    Ok(ConferenceLink {
        pointer,
        conference,
        name,
    })
}
