//! Change detection between decoded and edited team tables.

use crate::decode::TeamRow;
use crate::layout::Field;
use crate::{Error, Result};

/// One edited cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub row: usize,
    pub field: Field,
    pub old: String,
    pub new: String,
}

/// Compare two tables cell by cell.
///
/// Changes come out row-major, then in column order. Comparison is exact:
/// case-only and whitespace-only edits are changes.
pub fn diff(original: &[TeamRow], edited: &[TeamRow]) -> Result<Vec<FieldChange>> {
    if original.len() != edited.len() {
        return Err(Error::RowCountMismatch {
            expected: original.len(),
            actual: edited.len(),
        });
    }

    let mut changes = Vec::new();
    for (row, (before, after)) in original.iter().zip(edited).enumerate() {
        if before.conference.is_some() != after.conference.is_some() {
            return Err(Error::FieldCountMismatch { team: row });
        }

        for field in Field::EXTENDED {
            let (Some(old), Some(new)) = (before.get(field), after.get(field)) else {
                continue;
            };
            if old != new {
                changes.push(FieldChange {
                    row,
                    field,
                    old: old.to_owned(),
                    new: new.to_owned(),
                });
            }
        }
    }

    Ok(changes)
}
