//! Cursor over big-endian record data.
//!
//! Integers in roster archives are big-endian; text is UTF-16LE and goes
//! through [`crate::utf16`]. Nothing is copied out of the buffer.

use byteorder::{BigEndian, ByteOrder};
use zerocopy::{FromBytes, Immutable, KnownLayout};

use crate::utf16::{self, HeapString};
use crate::{Error, Result};

/// Bounds-checked big-endian cursor.
///
/// # Example
///
/// ```
/// use courtside_common::BinaryReader;
///
/// let data = [0x00, 0x00, 0x01, 0x00, 0x12, 0x34];
/// let mut cursor = BinaryReader::new(&data);
///
/// assert_eq!(cursor.read_u32().unwrap(), 0x100);
/// assert_eq!(cursor.read_u16().unwrap(), 0x1234);
/// assert!(cursor.is_empty());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BinaryReader<'a> {
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self::new_at(data, 0)
    }

    /// Start reading at absolute offset `pos`.
    #[inline]
    pub const fn new_at(data: &'a [u8], pos: usize) -> Self {
        Self { data, pos }
    }

    /// Current absolute offset.
    #[inline]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// The next `count` bytes, without moving.
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        let available = self.remaining();
        if available < count {
            return Err(Error::UnexpectedEof {
                offset: self.pos,
                needed: count,
                available,
            });
        }
        Ok(&self.data[self.pos..self.pos + count])
    }

    /// The next `count` bytes, moving past them.
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.pos += count;
        Ok(bytes)
    }

    #[inline]
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    #[inline]
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Read a terminated UTF-16LE string and move past its terminator.
    pub fn read_utf16z(&mut self) -> Result<HeapString> {
        let string = utf16::read_utf16z(self.data, self.pos as u32)?;
        self.pos = string.end();
        Ok(string)
    }

    /// Borrow a fixed-layout view of the next `size_of::<T>()` bytes.
    pub fn read_ref<T: FromBytes + KnownLayout + Immutable>(&mut self) -> Result<&'a T> {
        let offset = self.pos;
        let needed = std::mem::size_of::<T>();
        let bytes = self.read_bytes(needed)?;
        T::ref_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            offset,
            needed,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::byteorder::{BigEndian as Be, U32};

    #[test]
    fn test_big_endian_words() {
        let data = [
            0x00u8, 0x0C, 0xBF, 0xE0, // 0x000CBFE0
            0xFF, 0xFF, 0xFF, 0xFC, // -4 as a displacement
        ];
        let mut cursor = BinaryReader::new(&data);

        assert_eq!(cursor.read_u32().unwrap(), 0x000C_BFE0);
        assert_eq!(cursor.read_u32().unwrap() as i32, -4);
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_peek_then_read() {
        let data = [0xAB, 0xCD, 0x01];
        let mut cursor = BinaryReader::new(&data);

        assert_eq!(cursor.peek_bytes(2).unwrap(), &[0xAB, 0xCD]);
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.read_u16().unwrap(), 0xABCD);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_strings_back_to_back() {
        let mut data = crate::encode_utf16z("Duke");
        data.extend(crate::encode_utf16z("Eagles"));
        let mut cursor = BinaryReader::new(&data);

        assert_eq!(cursor.read_utf16z().unwrap().text, "Duke");
        assert_eq!(cursor.position(), 10);
        assert_eq!(cursor.read_utf16z().unwrap().text, "Eagles");
        assert!(cursor.is_empty());
    }

    #[test]
    fn test_struct_view() {
        #[derive(FromBytes, KnownLayout, Immutable)]
        #[repr(C)]
        struct Pair {
            a: U32<Be>,
            b: U32<Be>,
        }

        let data = [0, 0, 0, 1, 0, 0, 0, 2, 9];
        let mut cursor = BinaryReader::new(&data);
        let pair: &Pair = cursor.read_ref().unwrap();
        assert_eq!((pair.a.get(), pair.b.get()), (1, 2));
        assert_eq!(cursor.remaining(), 1);
        assert!(cursor.read_ref::<Pair>().is_err());
    }

    #[test]
    fn test_short_read() {
        let data = [0x01, 0x02];
        let mut cursor = BinaryReader::new_at(&data, 1);

        assert!(matches!(
            cursor.read_u32(),
            Err(Error::UnexpectedEof { offset: 1, needed: 4, available: 1 })
        ));
    }

    #[test]
    fn test_past_end() {
        let cursor = BinaryReader::new_at(&[0u8; 4], 9);
        assert!(cursor.is_empty());
        assert!(cursor.peek_bytes(1).is_err());
    }
}
