//! The fixed-capacity associative store itself.

use super::entry::Entry;
use super::handle::{CacheHandle, EntryId};
use super::policy::{self, NORMAL_WEIGHT};
use super::stats::CacheSnapshot;
use crate::config::CacheConfig;
use crate::error::CacheError;

/// A small, fixed-capacity cache of large pixel buffers, keyed by
/// `(basichash, hash)` fingerprints.
///
/// Owned by exactly one pipe instance; every primitive below takes `&mut
/// self` and is serialized by the borrow checker (there is no internal
/// locking, because cache operations run cooperatively on a single thread).
pub struct PixelCache {
    entries: Vec<Entry>,
    queries: u64,
    misses: u64,
    log_level: log::LevelFilter,
}

impl PixelCache {
    /// Allocates `config.entries` buffers, each `config.initial_size` bytes.
    ///
    /// Fails only if one of those initial allocations cannot be made; this
    /// is fatal and the caller should treat it as such.
    pub fn new(config: CacheConfig) -> Result<Self, CacheError> {
        if config.entries == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        let mut entries = Vec::with_capacity(config.entries);
        for index in 0..config.entries {
            let entry = Entry::try_empty(config.initial_size).map_err(|_| CacheError::Alloc {
                entry: index,
                requested: config.initial_size,
            })?;
            entries.push(entry);
        }
        if config.log_level >= log::LevelFilter::Debug {
            log::debug!(
                "pixelcache: constructed with {} entries of {} bytes each",
                config.entries,
                config.initial_size
            );
        }
        Ok(Self {
            entries,
            queries: 0,
            misses: 0,
            log_level: config.log_level,
        })
    }

    /// Idempotent: drops every entry's buffer back to zero length. After
    /// this call the cache behaves as freshly constructed with
    /// `initial_size == 0`; future `get` calls will grow entries again on
    /// demand.
    pub fn cleanup(&mut self) {
        for entry in &mut self.entries {
            entry.data.clear();
            entry.data.shrink_to_fit();
            entry.clear();
        }
    }

    /// Number of entries this cache was constructed with.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Normal-priority lookup/allocation.
    ///
    /// Returns a handle that is a hit if some entry already holds `hash`,
    /// or a miss that has manufactured a buffer of at least `size` bytes
    /// for the caller to fill. The hit/miss flag is the only thing telling
    /// the caller whether recomputation is needed; the cache never "fails
    /// to find".
    pub fn get(
        &mut self,
        basichash: u64,
        hash: u64,
        size: usize,
    ) -> Result<CacheHandle<'_>, CacheError> {
        self.get_with_weight(basichash, hash, size, NORMAL_WEIGHT)
    }

    /// Like [`Self::get`], but pins the returned entry with a strong bias
    /// that survives several rounds of aging.
    pub fn get_important(
        &mut self,
        basichash: u64,
        hash: u64,
        size: usize,
    ) -> Result<CacheHandle<'_>, CacheError> {
        let weight = policy::important_weight(self.entries.len());
        self.get_with_weight(basichash, hash, size, weight)
    }

    /// Like [`Self::get`], but sets the returned entry's weight to a
    /// caller-supplied value (typically negative, to pin).
    pub fn get_weighted(
        &mut self,
        basichash: u64,
        hash: u64,
        size: usize,
        weight: i64,
    ) -> Result<CacheHandle<'_>, CacheError> {
        self.get_with_weight(basichash, hash, size, weight)
    }

    fn get_with_weight(
        &mut self,
        basichash: u64,
        hash: u64,
        size: usize,
        weight: i64,
    ) -> Result<CacheHandle<'_>, CacheError> {
        self.queries += 1;

        if let Some(hit_index) = self.entries.iter().position(|e| e.matches(hash)) {
            policy::touch(&mut self.entries, hit_index, weight);
            if self.log_level >= log::LevelFilter::Debug {
                log::debug!("pixelcache: hit on entry {hit_index} for hash {hash:#x}");
            }
            let entry = &mut self.entries[hit_index];
            return Ok(CacheHandle::new(EntryId(hit_index), entry, true));
        }

        self.misses += 1;
        let victim = policy::select_victim(&self.entries);
        let current_size = self.entries[victim].data.len();
        let log_level = self.log_level;
        self.entries[victim].try_grow(size).map_err(|_| {
            if log_level >= log::LevelFilter::Warn {
                log::warn!(
                    "pixelcache: failed to grow entry {victim} from {current_size} to {size} bytes"
                );
            }
            CacheError::Grow {
                entry: victim,
                from: current_size,
                to: size,
            }
        })?;

        self.entries[victim].basichash = basichash;
        self.entries[victim].hash = hash;
        self.entries[victim].occupied = true;
        policy::touch(&mut self.entries, victim, weight);

        if self.log_level >= log::LevelFilter::Debug {
            log::debug!("pixelcache: miss, evicting entry {victim} for hash {hash:#x}");
        }
        let entry = &mut self.entries[victim];
        Ok(CacheHandle::new(EntryId(victim), entry, false))
    }

    /// Non-destructive probe: does `hash` currently identify a resident
    /// entry? Does not age anything and does not count as a query.
    pub fn available(&self, hash: u64) -> bool {
        self.entries.iter().any(|e| e.matches(hash))
    }

    /// Zeroes every entry's hashes and weight back to empty. Buffer
    /// allocations are kept, not freed.
    pub fn flush(&mut self) {
        for entry in &mut self.entries {
            entry.clear();
        }
        if self.log_level >= log::LevelFilter::Debug {
            log::debug!("pixelcache: flushed all entries");
        }
    }

    /// Flushes every entry whose `basichash` differs from the given value,
    /// leaving upstream intermediates that still match untouched.
    pub fn flush_all_but(&mut self, basichash: u64) {
        let mut kept = 0usize;
        for entry in &mut self.entries {
            if entry.occupied && entry.basichash != basichash {
                entry.clear();
            } else if entry.occupied {
                kept += 1;
            }
        }
        if self.log_level >= log::LevelFilter::Debug {
            log::debug!("pixelcache: flush_all_but({basichash:#x}) kept {kept} entries");
        }
    }

    /// Flushes the entry identified by `id`, if it still exists. Unknown or
    /// stale ids are silently ignored, never a panic.
    pub fn invalidate(&mut self, id: EntryId) {
        if let Some(entry) = self.entries.get_mut(id.0) {
            entry.clear();
        } else if self.log_level >= log::LevelFilter::Warn {
            log::warn!("pixelcache: invalidate() called with out-of-range id {}", id.0);
        }
    }

    /// Re-pins the entry identified by `id` with an important-level bias.
    /// Unknown or stale ids are silently ignored.
    pub fn reweight(&mut self, id: EntryId) {
        if id.0 >= self.entries.len() || !self.entries[id.0].occupied {
            if self.log_level >= log::LevelFilter::Warn {
                log::warn!("pixelcache: reweight() called with unknown id {}", id.0);
            }
            return;
        }
        let bias = policy::reweight_bias(self.entries.len());
        policy::touch(&mut self.entries, id.0, bias);
    }

    /// An owned, `Display`-able snapshot of the whole cache, for
    /// diagnostics. Never called on any hot path.
    pub fn print(&self) -> CacheSnapshot {
        CacheSnapshot::capture(&self.entries, self.queries, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(entries: usize) -> PixelCache {
        PixelCache::new(CacheConfig::new().entries(entries).initial_size(0)).unwrap()
    }

    #[test]
    fn basic_reuse_hits_on_second_lookup() {
        let mut c = cache(3);
        let a_ptr = {
            let h = c.get(1, 10, 64).unwrap();
            assert!(!h.hit());
            h.data().as_ptr()
        };
        let h2 = c.get(1, 10, 64).unwrap();
        assert!(h2.hit());
        assert_eq!(h2.data().as_ptr(), a_ptr);
        let snap = c.print();
        assert_eq!(snap.queries, 2);
        assert_eq!(snap.misses, 1);
    }

    #[test]
    fn lru_eviction_evicts_oldest() {
        let mut c = cache(3);
        c.get(0, 10, 8).unwrap();
        c.get(0, 20, 8).unwrap();
        c.get(0, 30, 8).unwrap();
        let miss = c.get(0, 40, 8).unwrap();
        assert!(!miss.hit());
        assert!(!c.available(10));
        assert!(c.available(20));
        assert!(c.available(30));
        assert!(c.available(40));
    }

    #[test]
    fn hit_refreshes_age_and_changes_next_victim() {
        let mut c = cache(3);
        c.get(0, 10, 8).unwrap();
        c.get(0, 20, 8).unwrap();
        c.get(0, 30, 8).unwrap();
        let hit = c.get(0, 10, 8).unwrap();
        assert!(hit.hit());
        c.get(0, 40, 8).unwrap();
        assert!(c.available(10));
        assert!(!c.available(20));
        assert!(c.available(30));
        assert!(c.available(40));
    }

    #[test]
    fn important_entry_survives_eviction_round() {
        let mut c = cache(3);
        c.get_important(0, 10, 8).unwrap();
        c.get(0, 20, 8).unwrap();
        c.get(0, 30, 8).unwrap();
        c.get(0, 40, 8).unwrap();
        assert!(c.available(10));
        assert!(!c.available(20));
    }

    #[test]
    fn pin_survives_n_minus_one_fresh_gets() {
        let n = 4;
        let mut c = cache(n);
        c.get_important(0, 999, 8).unwrap();
        for h in 1..n {
            c.get(0, h as u64, 8).unwrap();
        }
        assert!(c.available(999));
    }

    #[test]
    fn flush_all_but_preserves_matching_basichash() {
        let mut c = cache(3);
        c.get(1, 10, 8).unwrap();
        c.get(2, 20, 8).unwrap();
        c.get(1, 30, 8).unwrap();
        c.flush_all_but(1);
        assert!(c.available(10));
        assert!(!c.available(20));
        assert!(c.available(30));
    }

    #[test]
    fn invalidate_clears_entry_and_allows_reuse() {
        let mut c = cache(3);
        let id = {
            let h = c.get(0, 10, 8).unwrap();
            h.id()
        };
        c.invalidate(id);
        assert!(!c.available(10));
        let miss = c.get(0, 10, 8).unwrap();
        assert!(!miss.hit());
    }

    #[test]
    fn invalidate_unknown_id_is_a_no_op() {
        let mut c = cache(3);
        c.get(0, 10, 8).unwrap();
        c.invalidate(EntryId(99));
        assert!(c.available(10));
    }

    #[test]
    fn reweight_unknown_id_is_a_no_op() {
        let mut c = cache(3);
        c.get(0, 10, 8).unwrap();
        c.reweight(EntryId(99));
        assert!(c.available(10));
    }

    #[test]
    fn reweight_pins_an_existing_entry() {
        let mut c = cache(3);
        let id = {
            let h = c.get(0, 10, 8).unwrap();
            h.id()
        };
        c.get(0, 20, 8).unwrap();
        c.get(0, 30, 8).unwrap();
        c.reweight(id);
        c.get(0, 40, 8).unwrap();
        assert!(c.available(10));
    }

    #[test]
    fn available_does_not_disturb_subsequent_get() {
        let mut c = cache(3);
        c.get(0, 10, 8).unwrap();
        c.get(0, 20, 8).unwrap();
        c.get(0, 30, 8).unwrap();
        assert!(c.available(10));
        assert!(c.available(10));
        let miss = c.get(0, 40, 8).unwrap();
        assert!(!miss.hit());
        assert!(!c.available(10));
    }

    #[test]
    fn miss_always_returns_a_usable_buffer_of_requested_size() {
        let mut c = cache(2);
        let h = c.get(0, 10, 256).unwrap();
        assert_eq!(h.data().len(), 256);
    }

    #[test]
    fn zero_capacity_config_is_rejected() {
        let err = PixelCache::new(CacheConfig::new().entries(0));
        assert!(matches!(err, Err(CacheError::ZeroCapacity)));
    }

    #[test]
    fn log_level_off_constructs_and_operates_normally() {
        let mut c = PixelCache::new(
            CacheConfig::new()
                .entries(2)
                .log_level(log::LevelFilter::Off),
        )
        .unwrap();
        let miss = c.get(0, 10, 8).unwrap();
        assert!(!miss.hit());
        let hit = c.get(0, 10, 8).unwrap();
        assert!(hit.hit());
    }

    #[test]
    fn cleanup_is_idempotent_and_resets_entries() {
        let mut c = cache(2);
        c.get(0, 10, 64).unwrap();
        c.cleanup();
        c.cleanup();
        assert!(!c.available(10));
        let h = c.get(0, 10, 16).unwrap();
        assert_eq!(h.data().len(), 16);
    }

    #[test]
    fn print_reports_capacity_and_counts() {
        let mut c = cache(3);
        c.get(0, 10, 8).unwrap();
        c.get(0, 10, 8).unwrap();
        let snap = c.print();
        assert_eq!(snap.capacity, 3);
        assert_eq!(snap.queries, 2);
        assert_eq!(snap.misses, 1);
        assert_eq!(snap.entries.len(), 3);
    }
}
