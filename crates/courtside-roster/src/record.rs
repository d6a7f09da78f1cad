//! Views over team and conference records.
//!
//! Records are never copied out of the buffer; a record is just a base offset
//! and every field is read through [`FieldPointer`], which applies the single
//! self-relative formula from [`courtside_common::pointer`].

use byteorder::{BigEndian, ByteOrder};
use courtside_common::pointer::{self, POINTER_SIZE};
use courtside_common::BinaryReader;
use zerocopy::byteorder::{BigEndian as Be, U32};
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// Number of leading pointer slots mapped by [`PointerSlots`].
pub const SLOT_COUNT: usize = 7;

/// The leading pointer slots of a team record, borrowed straight from the buffer.
#[derive(Debug, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct PointerSlots {
    slots: [U32<Be>; SLOT_COUNT],
}

impl PointerSlots {
    /// Borrow the slots of the record starting at `record_base`.
    pub fn at(data: &[u8], record_base: u32) -> courtside_common::Result<&Self> {
        BinaryReader::new_at(data, record_base as usize).read_ref()
    }

    /// Raw stored value of `slot`.
    pub fn stored(&self, slot: u32) -> u32 {
        self.slots[slot as usize].get()
    }
}

/// A pointer field with its stored displacement and resolved target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldPointer {
    /// Absolute offset of the 4-byte field.
    pub field_address: u32,
    /// Big-endian value stored in the field.
    pub stored: u32,
    /// `field_address + stored`.
    pub target: u32,
}

impl FieldPointer {
    /// Resolve a stored value measured from `anchor`.
    ///
    /// For every field except a record-anchored conference pointer, the
    /// anchor is the field address itself.
    pub fn from_stored(
        field_address: u32,
        anchor: u32,
        stored: u32,
        len: usize,
    ) -> courtside_common::Result<Self> {
        let target = pointer::resolve(anchor, stored, len)?;
        Ok(Self {
            field_address,
            stored,
            target,
        })
    }

    /// Read and resolve slot `slot` of the record at `record_base`.
    pub fn read(data: &[u8], record_base: u32, slot: u32) -> courtside_common::Result<Self> {
        let field_address = pointer::field_address(record_base, slot);
        let stored = BinaryReader::new_at(data, field_address as usize).read_u32()?;
        Self::from_stored(field_address, field_address, stored, data.len())
    }
}

/// Store a displacement at `field_address` (measured from `anchor`) so the
/// field resolves to `target`. Returns the stored value.
pub fn write_pointer(data: &mut [u8], field_address: u32, anchor: u32, target: u32) -> u32 {
    let stored = pointer::displacement(anchor, target);
    let start = field_address as usize;
    BigEndian::write_u32(&mut data[start..start + POINTER_SIZE as usize], stored);
    stored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_view() {
        let mut data = vec![0u8; 64];
        for slot in 0..SLOT_COUNT as u32 {
            let addr = pointer::field_address(8, slot);
            write_pointer(&mut data, addr, addr, 40 + slot);
        }
        let slots = PointerSlots::at(&data, 8).unwrap();
        assert_eq!(slots.stored(0), 32);
        assert_eq!(slots.stored(6), 14);
        assert!(PointerSlots::at(&data, 40).is_err());
    }

    #[test]
    fn test_read_field_pointer() {
        let mut data = vec![0u8; 0x100];
        let stored = write_pointer(&mut data, 0x14, 0x14, 0x80);
        assert_eq!(stored, 0x6C);

        let field = FieldPointer::read(&data, 0x10, 1).unwrap();
        assert_eq!(field.field_address, 0x14);
        assert_eq!(field.stored, 0x6C);
        assert_eq!(field.target, 0x80);
        assert_eq!(field.target - field.field_address, field.stored);
    }

    #[test]
    fn test_record_anchor() {
        let mut data = vec![0u8; 0x100];
        write_pointer(&mut data, 0x28, 0x10, 0x90);
        assert_eq!(BigEndian::read_u32(&data[0x28..]), 0x80);
        let field = FieldPointer::from_stored(0x28, 0x10, 0x80, data.len()).unwrap();
        assert_eq!(field.target, 0x90);
    }

    #[test]
    fn test_out_of_range_pointer() {
        let mut data = vec![0u8; 0x40];
        write_pointer(&mut data, 0, 0, 0x1000);
        assert!(FieldPointer::read(&data, 0, 0).is_err());
    }
}
