//! Monotonic bump allocator over pre-existing null padding.
//!
//! The archive never grows, so new strings can only go where the file already
//! holds zeros. The allocator looks for runs of at least [`MIN_FREE_RUN`]
//! zero bytes, scanning forward from its cursor in whole code units. A run
//! found past the scratch origin is entered [`SEPARATOR`] bytes late so
//! the previous occupant keeps its terminator padding. The cursor never moves
//! backwards and there is no free list.

use crate::{Error, Result};

/// Smallest run of zero bytes treated as free space (five null code units).
pub const MIN_FREE_RUN: usize = 10;

/// Gap left in front of an allocation placed past the scratch origin.
pub const SEPARATOR: usize = 2;

const UNIT: usize = 2;

/// A span handed out by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allocation {
    pub start: u32,
    pub len: usize,
}

impl Allocation {
    /// Offset one past the allocation.
    pub fn end(&self) -> u32 {
        self.start + self.len as u32
    }
}

/// Bump allocator state for one encode pass.
#[derive(Debug, Clone)]
pub struct BumpAllocator {
    origin: u32,
    cursor: u32,
}

impl BumpAllocator {
    /// Start allocating at the scratch origin.
    pub fn new(origin: u32) -> Self {
        Self {
            origin,
            cursor: origin,
        }
    }

    /// Position the next search starts from.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Reserve `len` bytes of zeroed space for a new string.
    ///
    /// The span is not written; the caller copies the encoded string into
    /// `data[start..end]`. Fails with [`Error::AllocatorExhausted`] when no
    /// free run that fits remains before the end of the buffer.
    pub fn allocate(&mut self, data: &[u8], len: usize) -> Result<Allocation> {
        let mut from = self.cursor as usize;

        loop {
            let run = seek_free_run(data, from).ok_or(Error::AllocatorExhausted {
                cursor: self.cursor as usize,
                needed: len,
            })?;
            let start = if run > self.origin as usize {
                run + SEPARATOR
            } else {
                run
            };
            let end = start + len;

            if end <= data.len() && data[start..end].iter().all(|&b| b == 0) {
                tracing::trace!(start, len, "allocated heap span");
                self.cursor = end as u32;
                return Ok(Allocation {
                    start: start as u32,
                    len,
                });
            }

            from = run + UNIT;
        }
    }

    /// Whether `data[start..start + len]` is zero padding a later
    /// [`allocate`](Self::allocate) could still hand out.
    ///
    /// Allocations only ever come from all-zero bytes past the cursor that
    /// belong to a run of at least [`MIN_FREE_RUN`] zeros.
    pub fn may_claim(&self, data: &[u8], start: u32, len: usize) -> bool {
        let start = start as usize;
        let end = start + len;
        if end <= self.cursor as usize || end > data.len() {
            return false;
        }
        if data[start..end].iter().any(|&b| b != 0) {
            return false;
        }

        let before = data[..start]
            .iter()
            .rev()
            .take(MIN_FREE_RUN)
            .take_while(|&&b| b == 0)
            .count();
        let after = data[end..]
            .iter()
            .take(MIN_FREE_RUN)
            .take_while(|&&b| b == 0)
            .count();
        before + len + after >= MIN_FREE_RUN
    }
}

/// Start of the first run of [`MIN_FREE_RUN`] zero bytes at or after `from`,
/// stepping in code units.
fn seek_free_run(data: &[u8], from: usize) -> Option<usize> {
    let mut pos = from;
    let mut run = 0;

    while run < MIN_FREE_RUN {
        let unit = data.get(pos..pos + UNIT)?;
        if unit == [0, 0] {
            run += UNIT;
        } else {
            run = 0;
        }
        pos += UNIT;
    }

    Some(pos - MIN_FREE_RUN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_allocation_at_origin() {
        let data = vec![0u8; 64];
        let mut allocator = BumpAllocator::new(16);
        let first = allocator.allocate(&data, 8).unwrap();
        assert_eq!(first.start, 16);
        assert_eq!(allocator.cursor(), 24);
    }

    #[test]
    fn test_later_allocations_are_separated() {
        let mut data = vec![0u8; 64];
        let mut allocator = BumpAllocator::new(16);

        let first = allocator.allocate(&data, 6).unwrap();
        data[16..20].copy_from_slice(&[0x41, 0, 0x42, 0]);
        let second = allocator.allocate(&data, 6).unwrap();
        assert_eq!(first.start, 16);
        assert_eq!(second.start, first.end() + SEPARATOR as u32);
    }

    #[test]
    fn test_skips_occupied_space() {
        let mut data = vec![0u8; 96];
        // Occupied until 40, then a run too short for 12 bytes plus separator.
        data[16..40].fill(0x41);
        data[52..54].copy_from_slice(&[0x41, 0x00]);

        let mut allocator = BumpAllocator::new(16);
        let allocation = allocator.allocate(&data, 12).unwrap();
        assert!(allocation.start >= 54);
        assert!(data[allocation.start as usize..allocation.end() as usize]
            .iter()
            .all(|&b| b == 0));
    }

    #[test]
    fn test_short_runs_are_not_free() {
        let mut data = vec![0x41u8; 64];
        // Only 8 zero bytes: below the free-run threshold.
        data[20..28].fill(0);
        let mut allocator = BumpAllocator::new(16);
        assert!(matches!(
            allocator.allocate(&data, 2),
            Err(Error::AllocatorExhausted { cursor: 16, needed: 2 })
        ));
    }

    #[test]
    fn test_may_claim_free_padding() {
        let mut data = vec![0u8; 64];
        data[16..22].copy_from_slice(&[0x41, 0, 0, 0, 0x41, 0]);
        let mut allocator = BumpAllocator::new(16);

        // Padding past the cursor is fair game.
        assert!(allocator.may_claim(&data, 40, 2));
        // "A" and its terminator are not padding.
        assert!(!allocator.may_claim(&data, 16, 4));
        // A lone zero unit between two strings is too short to be free.
        assert!(!allocator.may_claim(&data, 18, 2));

        let allocation = allocator.allocate(&data, 2).unwrap();
        assert!(!allocator.may_claim(&data, allocation.start, 2));
    }

    #[test]
    fn test_cursor_is_monotonic() {
        let data = vec![0u8; 256];
        let mut allocator = BumpAllocator::new(32);
        let mut last_end = 0;
        for len in [4, 10, 2, 18, 6] {
            let allocation = allocator.allocate(&data, len).unwrap();
            assert!(allocation.start >= last_end);
            last_end = allocation.end();
        }
    }
}
