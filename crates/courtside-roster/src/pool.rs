//! String pool interning.
//!
//! The pool is a sequence of terminated UTF-16LE strings starting at the pool
//! origin. A string boundary is the origin itself or any 2-aligned position
//! right after a `0x0000` unit, which is exactly where a string-by-string walk
//! from the origin would stop. Lookups only report matches on a boundary.

use courtside_common::memchr::memmem;
use courtside_common::utf16::{TERMINATOR, UNIT_SIZE};

/// Find an existing copy of `encoded` (UTF-16LE with terminator) in the pool.
///
/// Returns the absolute offset of the first match on a string boundary at or
/// after `pool_start`.
pub fn find_interned(data: &[u8], pool_start: u32, encoded: &[u8]) -> Option<u32> {
    find_interned_where(data, pool_start, encoded, |_| true)
}

/// Like [`find_interned`], skipping matches whose offset `accept` rejects.
pub fn find_interned_where(
    data: &[u8],
    pool_start: u32,
    encoded: &[u8],
    accept: impl Fn(u32) -> bool,
) -> Option<u32> {
    let region = data.get(pool_start as usize..)?;
    let finder = memmem::Finder::new(encoded);

    let mut from = 0;
    while let Some(found) = finder.find(&region[from..]) {
        let pos = from + found;
        let offset = pool_start + pos as u32;
        if is_boundary(region, pos) && accept(offset) {
            return Some(offset);
        }
        from = pos + 1;
    }
    None
}

fn is_boundary(region: &[u8], pos: usize) -> bool {
    pos % UNIT_SIZE == 0 && (pos == 0 || region[pos - UNIT_SIZE..pos] == TERMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courtside_common::encode_utf16z;

    fn pool(strings: &[&str]) -> Vec<u8> {
        let mut data = vec![0xAAu8; 4];
        for s in strings {
            data.extend(encode_utf16z(s));
        }
        data.extend([0u8; 16]);
        data
    }

    #[test]
    fn test_finds_whole_string() {
        let data = pool(&["Duke", "Eagles", "Wildcat"]);
        assert_eq!(find_interned(&data, 4, &encode_utf16z("Eagles")), Some(14));
        assert_eq!(find_interned(&data, 4, &encode_utf16z("Duke")), Some(4));
        assert_eq!(find_interned(&data, 4, &encode_utf16z("Hawks")), None);
    }

    #[test]
    fn test_ignores_suffix_matches() {
        // "cat" is the tail of "Wildcat" but never starts a string.
        let data = pool(&["Wildcat"]);
        assert_eq!(find_interned(&data, 4, &encode_utf16z("cat")), None);
    }

    #[test]
    fn test_ignores_unaligned_matches() {
        let mut data = pool(&[]);
        // Bytes 41 00 00 00 place the string "A" one byte off the unit grid.
        data[5..9].copy_from_slice(&[0x41, 0x00, 0x00, 0x00]);
        data[4] = 0;
        assert_eq!(find_interned(&data, 4, &encode_utf16z("A")), None);
    }

    #[test]
    fn test_respects_pool_start() {
        let data = pool(&["Duke", "Duke"]);
        assert_eq!(find_interned(&data, 14, &encode_utf16z("Duke")), Some(14));
        assert_eq!(find_interned(&data, 400, &encode_utf16z("Duke")), None);
    }

    #[test]
    fn test_empty_string() {
        let data = pool(&["Duke", ""]);
        assert_eq!(find_interned(&data, 4, &encode_utf16z("")), Some(14));
    }

    #[test]
    fn test_rejected_matches_are_skipped() {
        let data = pool(&["Duke", "Eagles", "Duke"]);
        let duke = encode_utf16z("Duke");
        assert_eq!(find_interned_where(&data, 4, &duke, |offset| offset > 4), Some(28));
        assert_eq!(find_interned_where(&data, 4, &duke, |_| false), None);
    }
}
