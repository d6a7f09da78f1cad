//! Synthetic roster images for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;

use courtside_common::encode_utf16z;
use courtside_roster::record::write_pointer;
use courtside_roster::{ConferenceAnchor, Field, RosterFormat, RosterLayout, TableLayout};

pub const TEAM_STRIDE: u32 = 0x2C0;
pub const CONFERENCE_STRIDE: u32 = 0xB94;
pub const TEAM_START: u32 = 0x100;
pub const CONFERENCE_START: u32 = TEAM_START + 4 * TEAM_STRIDE;
pub const POOL_START: u32 = 0x2400;
pub const SCRATCH_ORIGIN: u32 = 0x3000;
pub const FILE_LEN: usize = 0x3800;

pub const STANDARD_TEAMS: [[&str; 5]; 4] = [
    ["State U", "Duke", "Bearcats", "Eagles", "Wildcat"],
    ["Bearcats", "State U", "Duke", "Wildcat", "Eagles"],
    ["Eagles", "Wildcat", "State U", "Duke", "Bearcats"],
    ["Wildcat", "Eagles", "Duke", "Bearcats", "State U"],
];

pub const STANDARD_CONFERENCES: [&str; 2] = ["ACC", "Big East"];

/// Layout of a four-team, two-conference image.
pub fn layout(format: RosterFormat) -> RosterLayout {
    RosterLayout {
        format,
        teams: TableLayout::new(TEAM_START, CONFERENCE_START, TEAM_STRIDE),
        conferences: TableLayout::new(
            CONFERENCE_START,
            CONFERENCE_START + 2 * CONFERENCE_STRIDE,
            CONFERENCE_STRIDE,
        ),
        pool_start: POOL_START,
        scratch_origin: SCRATCH_ORIGIN,
        conference_anchor: ConferenceAnchor::Field,
    }
}

/// Builder for roster images.
pub struct Fixture {
    pub layout: RosterLayout,
    teams: Vec<[String; 5]>,
    conferences: Vec<String>,
    team_conferences: Vec<usize>,
    dedup: bool,
    fill_scratch: bool,
    header_len: Option<u32>,
}

impl Fixture {
    pub fn new(layout: RosterLayout) -> Self {
        Self {
            layout,
            teams: Vec::new(),
            conferences: Vec::new(),
            team_conferences: Vec::new(),
            dedup: true,
            fill_scratch: false,
            header_len: None,
        }
    }

    /// The four standard teams and two conferences.
    pub fn standard(format: RosterFormat) -> Self {
        let mut fixture = Self::new(layout(format));
        for (index, team) in STANDARD_TEAMS.iter().enumerate() {
            fixture = fixture.team(*team, index % 2);
        }
        for name in STANDARD_CONFERENCES {
            fixture = fixture.conference(name);
        }
        fixture
    }

    pub fn team(mut self, names: [&str; 5], conference: usize) -> Self {
        self.teams.push(names.map(str::to_owned));
        self.team_conferences.push(conference);
        self
    }

    pub fn conference(mut self, name: &str) -> Self {
        self.conferences.push(name.to_owned());
        self
    }

    /// Give every field its own copy of its string.
    pub fn unshared(mut self) -> Self {
        self.dedup = false;
        self
    }

    /// Fill everything from the scratch origin on with non-null text units.
    pub fn without_free_space(mut self) -> Self {
        self.fill_scratch = true;
        self
    }

    pub fn header_len(mut self, len: u32) -> Self {
        self.header_len = Some(len);
        self
    }

    pub fn anchor(mut self, anchor: ConferenceAnchor) -> Self {
        self.layout.conference_anchor = anchor;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut data = vec![0u8; FILE_LEN];
        let header = self.header_len.unwrap_or(FILE_LEN as u32);
        data[..4].copy_from_slice(&header.to_be_bytes());

        let mut pool = Pool {
            cursor: self.layout.pool_start as usize,
            placed: HashMap::new(),
            dedup: self.dedup,
        };

        for (index, name) in self.conferences.iter().enumerate() {
            let base = self.layout.conferences.record_base(index);
            let target = pool.place(&mut data, name);
            write_pointer(&mut data, base, base, target);
        }

        for (index, names) in self.teams.iter().enumerate() {
            for (field, name) in Field::TEXT.into_iter().zip(names) {
                let address = self.layout.field_address(index, field);
                let target = pool.place(&mut data, name);
                write_pointer(&mut data, address, address, target);
            }
            if self.layout.has_conferences() {
                let conference = self.layout.conferences.record_base(self.team_conferences[index]);
                write_pointer(
                    &mut data,
                    self.layout.field_address(index, Field::Conference),
                    self.layout.conference_anchor(index),
                    conference,
                );
            }
        }

        assert!(pool.cursor < self.layout.scratch_origin as usize);

        if self.fill_scratch {
            for unit in data[self.layout.scratch_origin as usize..].chunks_exact_mut(2) {
                unit.copy_from_slice(&[0x5A, 0x00]);
            }
        }

        data
    }
}

struct Pool {
    cursor: usize,
    placed: HashMap<String, u32>,
    dedup: bool,
}

impl Pool {
    fn place(&mut self, data: &mut [u8], text: &str) -> u32 {
        if self.dedup {
            if let Some(&offset) = self.placed.get(text) {
                return offset;
            }
        }
        let encoded = encode_utf16z(text);
        let offset = self.cursor as u32;
        data[self.cursor..self.cursor + encoded.len()].copy_from_slice(&encoded);
        self.cursor += encoded.len();
        self.placed.insert(text.to_owned(), offset);
        offset
    }
}

/// Byte offsets at which two equal-length buffers differ.
pub fn changed_offsets(before: &[u8], after: &[u8]) -> Vec<usize> {
    assert_eq!(before.len(), after.len());
    before
        .iter()
        .zip(after)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(offset, _)| offset)
        .collect()
}
