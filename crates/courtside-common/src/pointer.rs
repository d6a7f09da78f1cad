//! Self-relative pointer arithmetic.
//!
//! Every pointer field in a roster archive stores a 32-bit big-endian
//! displacement measured from the address of the field itself. A field at
//! `field_address` holding `stored` therefore targets `field_address + stored`.
//! The same two functions are used for every field on both the read and the
//! write path.

use crate::{Error, Result};

/// Size of a pointer field in bytes.
pub const POINTER_SIZE: u32 = 4;

/// Address of pointer slot `slot` inside a record starting at `record_base`.
#[inline]
pub const fn field_address(record_base: u32, slot: u32) -> u32 {
    record_base + slot * POINTER_SIZE
}

/// Resolve a stored displacement into an absolute offset.
///
/// The addition wraps in 32 bits so that negative displacements (stored in
/// two's complement) resolve backwards. The result must lie inside a buffer
/// of `len` bytes.
#[inline]
pub fn resolve(field_address: u32, stored: u32, len: usize) -> Result<u32> {
    let target = field_address.wrapping_add(stored);
    if target as usize >= len {
        return Err(Error::PointerOutOfBounds {
            field_address,
            stored,
            target,
            len,
        });
    }
    Ok(target)
}

/// Displacement to store at `field_address` so that it resolves to `target`.
#[inline]
pub const fn displacement(field_address: u32, target: u32) -> u32 {
    target.wrapping_sub(field_address)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_field_relative() {
        let base = 0x1000;
        let addr = field_address(base, 3);
        assert_eq!(addr, 0x100C);
        assert_eq!(resolve(addr, 0x20, 0x2000).unwrap(), 0x102C);
    }

    #[test]
    fn test_displacement_inverts_resolve() {
        for &(addr, target) in &[(0x10u32, 0x400u32), (0x800, 0x20), (0, 0)] {
            let stored = displacement(addr, target);
            assert_eq!(resolve(addr, stored, 0x1000).unwrap(), target);
            assert_eq!(target.wrapping_sub(addr), stored);
        }
    }

    #[test]
    fn test_negative_displacement_wraps_backwards() {
        let stored = displacement(0x800, 0x100);
        assert!(stored > 0x8000_0000);
        assert_eq!(resolve(0x800, stored, 0x1000).unwrap(), 0x100);
    }

    #[test]
    fn test_out_of_bounds() {
        let err = resolve(0xF00, 0x200, 0x1000).unwrap_err();
        assert!(matches!(err, Error::PointerOutOfBounds { target: 0x1100, .. }));
        assert!(resolve(0, u32::MAX, 0x1000).is_err());
    }
}
