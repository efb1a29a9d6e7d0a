//! Instrumentation: query/miss counters and a printable snapshot.

use super::entry::{Entry, EntryState};

/// Per-entry state captured by [`CacheSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntrySnapshot {
    /// Slot index within the cache.
    pub index: usize,
    /// Conceptual state (empty/live/pinned) at snapshot time.
    pub state: EntryState,
    /// Current byte size of the entry's buffer.
    pub size: usize,
    /// Current aging weight.
    pub used: i64,
    /// Stored basic hash (meaningless when `state` is `Empty`).
    pub basichash: u64,
    /// Stored full hash (meaningless when `state` is `Empty`).
    pub hash: u64,
}

/// A point-in-time, owned view of the whole cache, for diagnostics.
///
/// Covers both whole-cache counters and per-entry state in one artifact,
/// since a cache only has one printable snapshot to offer, not two.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    /// Number of entries the cache was constructed with.
    pub capacity: usize,
    /// Total `get`/`get_important`/`get_weighted` calls so far.
    pub queries: u64,
    /// Total misses among those calls.
    pub misses: u64,
    /// Per-entry detail, in slot order.
    pub entries: Vec<EntrySnapshot>,
}

impl CacheSnapshot {
    pub(crate) fn capture(entries: &[Entry], queries: u64, misses: u64) -> Self {
        Self {
            capacity: entries.len(),
            queries,
            misses,
            entries: entries
                .iter()
                .enumerate()
                .map(|(index, e)| EntrySnapshot {
                    index,
                    state: e.state(),
                    size: e.data.len(),
                    used: e.used,
                    basichash: e.basichash,
                    hash: e.hash,
                })
                .collect(),
        }
    }

    /// Fraction of queries that were hits, in `[0.0, 1.0]`. `0.0` when no
    /// queries have been made yet.
    pub fn hit_rate(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            (self.queries - self.misses) as f64 / self.queries as f64
        }
    }
}

impl std::fmt::Display for CacheSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Cache: {} queries, {} misses ({:.1}% hit rate), {} entries",
            self.queries,
            self.misses,
            self.hit_rate() * 100.0,
            self.capacity
        )?;
        for e in &self.entries {
            writeln!(
                f,
                "  [{}] {:?} used={} size={}B basichash={:#x} hash={:#x}",
                e.index, e.state, e.used, e.size, e.basichash, e.hash
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_is_zero_before_any_query() {
        let snap = CacheSnapshot {
            capacity: 4,
            queries: 0,
            misses: 0,
            entries: Vec::new(),
        };
        assert_eq!(snap.hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_reflects_hits_and_misses() {
        let snap = CacheSnapshot {
            capacity: 4,
            queries: 10,
            misses: 3,
            entries: Vec::new(),
        };
        assert_eq!(snap.hit_rate(), 0.7);
    }

    #[test]
    fn display_does_not_panic_on_empty_cache() {
        let snap = CacheSnapshot {
            capacity: 0,
            queries: 0,
            misses: 0,
            entries: Vec::new(),
        };
        let _ = snap.to_string();
    }
}
