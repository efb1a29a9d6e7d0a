//! A single cache slot and its conceptual state machine.

use crate::descriptor::Dsc;

// A descriptor is copied on every hit and miss; keep it small so that
// doesn't become measurable next to the multi-megabyte buffers it
// accompanies.
static_assertions::const_assert!(core::mem::size_of::<Dsc>() <= 64);

/// The three conceptual states an entry moves through.
///
/// Not stored directly: derived from `occupied` and the sign of `used`,
/// because keeping it redundant with those two fields would let them drift
/// out of sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// Never written, or flushed/invalidated back to empty.
    Empty,
    /// Holds a valid `(basichash, hash)` pair and is eligible for normal
    /// aging.
    Live,
    /// Holds a valid pair and is protected from eviction by a negative
    /// `used` bias.
    Pinned,
}

/// One fixed cache slot.
///
/// The design-notes redesign point applies here: rather than an
/// implementation-defined sentinel hash that must be "unlikely to collide",
/// `occupied` is an explicit bit. An empty entry's `basichash`/`hash` fields
/// are simply `0` and are never consulted.
pub(crate) struct Entry {
    pub(crate) data: Vec<u8>,
    pub(crate) dsc: Dsc,
    pub(crate) basichash: u64,
    pub(crate) hash: u64,
    pub(crate) used: i64,
    pub(crate) occupied: bool,
}

impl Entry {
    pub(crate) fn empty(initial_size: usize) -> Self {
        Self::try_empty(initial_size).expect("allocation should not fail in tests")
    }

    /// Fallible constructor used by [`super::PixelCache::new`]: `Vec::resize`
    /// can't report an allocator failure on its own, so capacity is reserved
    /// up front with `try_reserve_exact` first.
    pub(crate) fn try_empty(initial_size: usize) -> Result<Self, ()> {
        let mut data = Vec::new();
        data.try_reserve_exact(initial_size).map_err(|_| ())?;
        data.resize(initial_size, 0);
        Ok(Self {
            data,
            dsc: Dsc::EMPTY,
            basichash: 0,
            hash: 0,
            used: 0,
            occupied: false,
        })
    }

    /// Grows `data` to at least `size` bytes if it is currently smaller.
    /// Fails without mutating `data` if the allocator cannot satisfy the
    /// request.
    pub(crate) fn try_grow(&mut self, size: usize) -> Result<(), ()> {
        if self.data.len() < size {
            let additional = size - self.data.len();
            self.data.try_reserve_exact(additional).map_err(|_| ())?;
            self.data.resize(size, 0);
        }
        Ok(())
    }

    pub(crate) fn state(&self) -> EntryState {
        if !self.occupied {
            EntryState::Empty
        } else if self.used < 0 {
            EntryState::Pinned
        } else {
            EntryState::Live
        }
    }

    pub(crate) fn matches(&self, hash: u64) -> bool {
        self.occupied && self.hash == hash
    }

    pub(crate) fn clear(&mut self) {
        self.occupied = false;
        self.basichash = 0;
        self.hash = 0;
        self.used = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_entry_is_empty() {
        let e = Entry::empty(16);
        assert_eq!(e.state(), EntryState::Empty);
        assert!(!e.matches(0));
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut e = Entry::empty(16);
        e.occupied = true;
        e.hash = 42;
        e.used = 3;
        assert_eq!(e.state(), EntryState::Live);
        e.clear();
        assert_eq!(e.state(), EntryState::Empty);
        assert!(!e.matches(42));
    }

    #[test]
    fn negative_used_is_pinned() {
        let mut e = Entry::empty(16);
        e.occupied = true;
        e.used = -8;
        assert_eq!(e.state(), EntryState::Pinned);
    }
}
