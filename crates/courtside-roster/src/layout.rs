//! Record layout constants and field definitions.

use std::fmt;
use std::str::FromStr;

use courtside_common::pointer;

use crate::{Error, Result};

/// Which record format the archive uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum RosterFormat {
    /// Five text pointers per team.
    Base,
    /// Five text pointers plus a conference pointer at byte 24.
    Extended,
}

impl FromStr for RosterFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "extended" => Ok(Self::Extended),
            other => Err(format!("unknown roster format {other:?} (expected base or extended)")),
        }
    }
}

/// Address a team's conference displacement is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ConferenceAnchor {
    /// From the conference pointer field itself, like every other field.
    #[default]
    Field,
    /// From the start of the team record.
    Record,
}

/// One editable column of a team row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Field {
    TeamName,
    Abbreviation,
    SecondaryName,
    Nickname,
    Mascot,
    Conference,
}

impl Field {
    /// The text fields present in every format, in column order.
    pub const TEXT: [Field; 5] = [
        Field::TeamName,
        Field::Abbreviation,
        Field::SecondaryName,
        Field::Nickname,
        Field::Mascot,
    ];

    /// Every field of the extended format, in column order.
    pub const EXTENDED: [Field; 6] = [
        Field::TeamName,
        Field::Abbreviation,
        Field::SecondaryName,
        Field::Nickname,
        Field::Mascot,
        Field::Conference,
    ];

    /// Column index in a team row.
    pub const fn column(self) -> usize {
        match self {
            Field::TeamName => 0,
            Field::Abbreviation => 1,
            Field::SecondaryName => 2,
            Field::Nickname => 3,
            Field::Mascot => 4,
            Field::Conference => 5,
        }
    }

    /// Pointer slot inside the team record. Slot 5 is not a string pointer.
    pub const fn slot(self) -> u32 {
        match self {
            Field::Conference => 6,
            other => other.column() as u32,
        }
    }

    /// Field for a row column.
    pub fn from_column(column: usize) -> Option<Field> {
        Self::EXTENDED.get(column).copied()
    }

    /// Whether this field points at a heap string.
    pub const fn is_text(self) -> bool {
        !matches!(self, Field::Conference)
    }

    /// Column name used by dumps and tabular exports.
    pub const fn label(self) -> &'static str {
        match self {
            Field::TeamName => "team_name",
            Field::Abbreviation => "team_abbr",
            Field::SecondaryName => "team_name_2",
            Field::Nickname => "nickname",
            Field::Mascot => "mascot",
            Field::Conference => "conference",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.to_ascii_lowercase().replace('-', "_");
        if let Ok(column) = needle.parse::<usize>() {
            return Field::from_column(column).ok_or_else(|| format!("no field at column {column}"));
        }
        let alias = match needle.as_str() {
            "name" => "team_name",
            "abbr" | "abbreviation" => "team_abbr",
            "name2" | "secondary_name" => "team_name_2",
            other => other,
        };
        Field::EXTENDED
            .into_iter()
            .find(|field| field.label() == alias)
            .ok_or_else(|| format!("unknown field {s:?}"))
    }
}

/// A fixed-stride array of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableLayout {
    /// Offset of the first record.
    pub start: u32,
    /// Offset one past the table.
    pub end: u32,
    /// Record size in bytes.
    pub stride: u32,
}

impl TableLayout {
    pub const fn new(start: u32, end: u32, stride: u32) -> Self {
        Self { start, end, stride }
    }

    /// Number of whole records in the table.
    pub const fn count(&self) -> usize {
        ((self.end - self.start) / self.stride) as usize
    }

    /// Offset of record `index`.
    pub const fn record_base(&self, index: usize) -> u32 {
        self.start + index as u32 * self.stride
    }

    /// Iterate over record base offsets.
    pub fn bases(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.count()).map(|index| self.record_base(index))
    }

    /// Index of the record starting exactly at `offset`.
    pub fn index_of(&self, offset: u32) -> Option<usize> {
        if offset < self.start || (offset - self.start) % self.stride != 0 {
            return None;
        }
        let index = ((offset - self.start) / self.stride) as usize;
        (index < self.count()).then_some(index)
    }

    fn validate(&self, name: &str) -> Result<()> {
        if self.stride == 0 {
            return Err(Error::InvalidLayout(format!("{name} table has zero stride")));
        }
        if self.end < self.start {
            return Err(Error::InvalidLayout(format!(
                "{name} table ends at {:#x} before it starts at {:#x}",
                self.end, self.start
            )));
        }
        let tail = (self.end - self.start) % self.stride;
        if tail != 0 {
            tracing::debug!("{} table has a {}-byte partial tail record, ignored", name, tail);
        }
        Ok(())
    }
}

/// Every format constant needed to decode and encode a roster archive.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterLayout {
    pub format: RosterFormat,
    pub teams: TableLayout,
    pub conferences: TableLayout,
    /// Where the interning scan starts.
    pub pool_start: u32,
    /// Where new strings are allocated from.
    pub scratch_origin: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub conference_anchor: ConferenceAnchor,
}

impl RosterLayout {
    pub const TEAM_INFO_START: u32 = 0x1D_8614;
    pub const TEAM_INFO_END: u32 = 0x22_4860;
    pub const TEAM_STRIDE: u32 = 0x2C0;
    pub const CONFERENCE_INFO_START: u32 = 0x34_597C;
    pub const CONFERENCE_INFO_END: u32 = 0x36_1198;
    pub const CONFERENCE_STRIDE: u32 = 0xB94;
    pub const STRING_POOL_START: u32 = 0x36_2CF8;
    pub const SCRATCH_ORIGIN: u32 = 0x3C_BFE0;

    /// Layout of the College Hoops 2K8 `USERDATA` roster.
    pub const fn college_hoops_2k8(format: RosterFormat) -> Self {
        Self {
            format,
            teams: TableLayout::new(Self::TEAM_INFO_START, Self::TEAM_INFO_END, Self::TEAM_STRIDE),
            conferences: TableLayout::new(
                Self::CONFERENCE_INFO_START,
                Self::CONFERENCE_INFO_END,
                Self::CONFERENCE_STRIDE,
            ),
            pool_start: Self::STRING_POOL_START,
            scratch_origin: Self::SCRATCH_ORIGIN,
            conference_anchor: ConferenceAnchor::Field,
        }
    }

    /// Fields carried by each team row.
    pub fn fields(&self) -> &'static [Field] {
        match self.format {
            RosterFormat::Base => &Field::TEXT,
            RosterFormat::Extended => &Field::EXTENDED,
        }
    }

    pub fn has_conferences(&self) -> bool {
        self.format == RosterFormat::Extended
    }

    /// Address of `field` in team record `index`.
    pub const fn field_address(&self, index: usize, field: Field) -> u32 {
        pointer::field_address(self.teams.record_base(index), field.slot())
    }

    /// Address the conference displacement of team `index` is measured from.
    pub const fn conference_anchor(&self, index: usize) -> u32 {
        match self.conference_anchor {
            ConferenceAnchor::Field => self.field_address(index, Field::Conference),
            ConferenceAnchor::Record => self.teams.record_base(index),
        }
    }

    /// Smallest buffer this layout can address.
    pub fn required_len(&self) -> usize {
        [
            self.teams.end,
            self.conferences.end,
            self.pool_start,
            self.scratch_origin,
        ]
        .into_iter()
        .max()
        .unwrap_or(0) as usize
    }

    /// Check that the constants describe usable tables.
    pub fn validate(&self) -> Result<()> {
        self.teams.validate("team")?;
        self.conferences.validate("conference")?;
        let slots = crate::record::SLOT_COUNT as u32;
        if self.teams.stride < slots * pointer::POINTER_SIZE {
            return Err(Error::InvalidLayout(format!(
                "team stride {:#x} cannot hold {} pointer slots",
                self.teams.stride, slots
            )));
        }
        if self.conferences.stride < pointer::POINTER_SIZE {
            return Err(Error::InvalidLayout(format!(
                "conference stride {:#x} cannot hold a name pointer",
                self.conferences.stride
            )));
        }
        Ok(())
    }
}

impl Default for RosterLayout {
    fn default() -> Self {
        Self::college_hoops_2k8(RosterFormat::Extended)
    }
}
