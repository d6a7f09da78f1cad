//! Null-terminated UTF-16LE strings in the shared string heap.

use crate::{Error, Result};

/// Size of one UTF-16 code unit in bytes.
pub const UNIT_SIZE: usize = 2;

/// The `0x0000` code unit that terminates every heap string.
pub const TERMINATOR: [u8; UNIT_SIZE] = [0, 0];

/// A string read from the heap, together with where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapString {
    /// Absolute offset of the first code unit.
    pub offset: u32,
    /// Decoded text. Unpaired surrogates become U+FFFD.
    pub text: String,
    /// Size on disk in bytes, terminator included.
    pub byte_len: usize,
}

impl HeapString {
    /// Offset one past the terminator.
    pub fn end(&self) -> usize {
        self.offset as usize + self.byte_len
    }
}

/// Read the null-terminated UTF-16LE string starting at `offset`.
pub fn read_utf16z(data: &[u8], offset: u32) -> Result<HeapString> {
    let start = offset as usize;
    if start >= data.len() {
        return Err(Error::UnexpectedEof {
            offset: start,
            needed: UNIT_SIZE,
            available: 0,
        });
    }

    let units_len = terminator_position(&data[start..])
        .ok_or(Error::MissingTerminator { offset: start })?;

    Ok(HeapString {
        offset,
        text: decode_units(&data[start..start + units_len]),
        byte_len: units_len + UNIT_SIZE,
    })
}

/// Read at most `max_bytes` of UTF-16LE text starting at `offset`, stopping
/// early at a terminator or at the end of the buffer.
pub fn read_utf16_bounded(data: &[u8], offset: usize, max_bytes: usize) -> String {
    let tail = data.get(offset..).unwrap_or_default();
    let limit = tail.len().min(max_bytes) & !1;
    let window = &tail[..limit];
    let len = terminator_position(window).unwrap_or(window.len());
    decode_units(&window[..len])
}

/// Encode `text` as UTF-16LE followed by the terminator.
pub fn encode_utf16z(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity((text.len() + 1) * UNIT_SIZE);
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes.extend_from_slice(&TERMINATOR);
    bytes
}

/// Byte offset of the first aligned `0x0000` unit in `bytes`.
fn terminator_position(bytes: &[u8]) -> Option<usize> {
    bytes
        .chunks_exact(UNIT_SIZE)
        .position(|unit| unit == TERMINATOR)
        .map(|index| index * UNIT_SIZE)
}

fn decode_units(bytes: &[u8]) -> String {
    let units = bytes
        .chunks_exact(UNIT_SIZE)
        .map(|unit| u16::from_le_bytes([unit[0], unit[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}
