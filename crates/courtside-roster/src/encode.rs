//! Heap patching: turning edited rows back into the same fixed-size file.
//!
//! Every changed text field is written with the cheapest strategy that keeps
//! all other fields intact:
//!
//! 1. **Interned** - an identical string already exists in the pool, so only
//!    the pointer is patched.
//! 2. **In place** - the new text has the same encoded length as the old one,
//!    nothing else points at the old string and no other cell shows the new
//!    text, so the old bytes are overwritten and the pointer is left alone.
//! 3. **Relocated** - the string goes into free null padding handed out by the
//!    [`BumpAllocator`] and the pointer is patched to it.
//!
//! Conference changes only re-point the team's conference pointer.
//!
//! All work happens on a staging copy of the buffer; callers only ever see
//! either a fully patched copy or an error.

use courtside_common::{encode_utf16z, read_utf16z};

use crate::allocator::BumpAllocator;
use crate::decode::{Conference, TeamRow};
use crate::diff::{diff, FieldChange};
use crate::layout::{Field, RosterLayout};
use crate::pool;
use crate::record::{write_pointer, FieldPointer};
use crate::{Error, Result};

/// How a changed field was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchAction {
    /// Pointer now targets an existing identical string.
    Interned { target: u32 },
    /// Old string overwritten where it was.
    InPlace { address: u32 },
    /// New string written to freshly allocated space.
    Relocated { start: u32, end: u32 },
    /// Conference pointer now targets another conference record.
    Repointed { conference: usize, target: u32 },
}

/// One applied edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub row: usize,
    pub field: Field,
    /// Text before the edit.
    pub old: String,
    pub new: String,
    pub field_address: u32,
    pub action: PatchAction,
}

/// Everything an encode pass did, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodeReport {
    pub patches: Vec<Patch>,
}

impl EncodeReport {
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    pub fn interned(&self) -> usize {
        self.count(|action| matches!(action, PatchAction::Interned { .. }))
    }

    pub fn in_place(&self) -> usize {
        self.count(|action| matches!(action, PatchAction::InPlace { .. }))
    }

    pub fn relocated(&self) -> usize {
        self.count(|action| matches!(action, PatchAction::Relocated { .. }))
    }

    pub fn repointed(&self) -> usize {
        self.count(|action| matches!(action, PatchAction::Repointed { .. }))
    }

    /// Heap spans written by relocations, in allocation order.
    pub fn allocations(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.patches.iter().filter_map(|patch| match patch.action {
            PatchAction::Relocated { start, end } => Some((start, end)),
            _ => None,
        })
    }

    /// The patch applied to a given cell, if any.
    pub fn patch_for(&self, row: usize, field: Field) -> Option<&Patch> {
        self.patches
            .iter()
            .find(|patch| patch.row == row && patch.field == field)
    }

    fn count(&self, predicate: impl Fn(&PatchAction) -> bool) -> usize {
        self.patches
            .iter()
            .filter(|patch| predicate(&patch.action))
            .count()
    }
}

/// Encode `edited` over `data`, returning the patched copy.
///
/// `original` must be the rows decoded from `data`; `conferences` the decoded
/// conference table (only used for conference reassignment).
pub fn encode(
    data: &[u8],
    layout: &RosterLayout,
    conferences: &[Conference],
    original: &[TeamRow],
    edited: &[TeamRow],
) -> Result<(Vec<u8>, EncodeReport)> {
    layout.validate()?;
    let changes = diff(original, edited)?;
    let mut staged = data.to_vec();
    let mut report = EncodeReport::default();

    if changes.is_empty() {
        return Ok((staged, report));
    }

    let mut patcher = Patcher {
        data: &mut staged,
        layout,
        conferences,
        edited,
        allocator: BumpAllocator::new(layout.scratch_origin),
    };

    for change in changes {
        let action = patcher.apply(&change)?;
        tracing::debug!(
            team = change.row,
            field = %change.field,
            ?action,
            "{:?} -> {:?}",
            change.old,
            change.new
        );
        report.patches.push(Patch {
            row: change.row,
            field: change.field,
            field_address: layout.field_address(change.row, change.field),
            old: change.old,
            new: change.new,
            action,
        });
    }

    debug_assert_eq!(staged.len(), data.len());
    Ok((staged, report))
}

struct Patcher<'a> {
    data: &'a mut [u8],
    layout: &'a RosterLayout,
    conferences: &'a [Conference],
    edited: &'a [TeamRow],
    allocator: BumpAllocator,
}

impl Patcher<'_> {
    fn apply(&mut self, change: &FieldChange) -> Result<PatchAction> {
        if change.field.is_text() {
            self.patch_text(change)
        } else {
            self.repoint_conference(change)
        }
    }

    fn patch_text(&mut self, change: &FieldChange) -> Result<PatchAction> {
        if change.new.contains('\0') {
            return Err(Error::InteriorNul {
                team: change.row,
                field: change.field,
            });
        }

        let inconsistent = |source| Error::FormatInconsistency {
            team: change.row,
            field: change.field,
            source,
        };

        let record_base = self.layout.teams.record_base(change.row);
        let current =
            FieldPointer::read(self.data, record_base, change.field.slot()).map_err(inconsistent)?;
        let old = read_utf16z(self.data, current.target).map_err(inconsistent)?;
        let encoded = encode_utf16z(&change.new);
        let field_address = current.field_address;

        // Zeros the allocator may still hand out are not a string yet.
        let data = &*self.data;
        let allocator = &self.allocator;
        let interned = pool::find_interned_where(data, self.layout.pool_start, &encoded, |target| {
            !allocator.may_claim(data, target, encoded.len())
        });
        if let Some(target) = interned {
            write_pointer(self.data, field_address, field_address, target);
            return Ok(PatchAction::Interned { target });
        }

        if encoded.len() == old.byte_len
            && self.reference_count(current.target).map_err(inconsistent)? == 1
            && !self.shown_elsewhere(change)
        {
            let start = current.target as usize;
            self.data[start..start + encoded.len()].copy_from_slice(&encoded);
            return Ok(PatchAction::InPlace {
                address: current.target,
            });
        }

        let allocation = self.allocator.allocate(self.data, encoded.len())?;
        let start = allocation.start as usize;
        self.data[start..start + encoded.len()].copy_from_slice(&encoded);
        write_pointer(self.data, field_address, field_address, allocation.start);
        Ok(PatchAction::Relocated {
            start: allocation.start,
            end: allocation.end(),
        })
    }

    fn repoint_conference(&mut self, change: &FieldChange) -> Result<PatchAction> {
        let conference = self
            .conferences
            .iter()
            .find(|conference| conference.name.text == change.new)
            .ok_or_else(|| Error::UnknownConference {
                team: change.row,
                name: change.new.clone(),
            })?;

        let field_address = self.layout.field_address(change.row, Field::Conference);
        let anchor = self.layout.conference_anchor(change.row);
        write_pointer(self.data, field_address, anchor, conference.offset);
        Ok(PatchAction::Repointed {
            conference: conference.index,
            target: conference.offset,
        })
    }

    /// Number of string pointers in the staged buffer that resolve to `address`.
    ///
    /// Covers every text field of every team plus every conference name.
    fn reference_count(&self, address: u32) -> courtside_common::Result<usize> {
        let mut count = 0;

        for base in self.layout.teams.bases() {
            for field in Field::TEXT {
                if FieldPointer::read(self.data, base, field.slot())?.target == address {
                    count += 1;
                }
            }
        }
        for base in self.layout.conferences.bases() {
            if FieldPointer::read(self.data, base, 0)?.target == address {
                count += 1;
            }
        }

        Ok(count)
    }

    /// Whether any other edited text cell shows the same text as `change.new`.
    fn shown_elsewhere(&self, change: &FieldChange) -> bool {
        self.edited.iter().enumerate().any(|(row, team)| {
            team.text_fields().any(|(field, text)| {
                (row, field) != (change.row, change.field) && text == change.new
            })
        })
    }
}
