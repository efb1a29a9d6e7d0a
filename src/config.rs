//! Cache construction tunables.

/// Builder for [`crate::cache::PixelCache`] construction parameters: a
/// handful of fluent setters over a small `Default`-able struct.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Number of entries the cache holds. Small and host-chosen (typically
    /// 2 to 8); never resized after construction.
    pub entries: usize,
    /// Initial byte size each entry's buffer is allocated to at
    /// construction. Grown on demand when a `get` requests more.
    pub initial_size: usize,
    /// Ceiling on how chatty [`crate::cache::PixelCache`]'s own logging gets.
    /// Hits/misses/evictions log at `Debug` and allocation shortfalls or
    /// stale-id lookups log at `Warn`; a message is only emitted when this
    /// level is at least as verbose as the message's own level.
    pub log_level: log::LevelFilter,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entries: 4,
            initial_size: 0,
            log_level: log::LevelFilter::Info,
        }
    }
}

impl CacheConfig {
    /// Start from the default configuration (4 entries, no initial
    /// allocation, `Info`-level logging).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of entries.
    pub fn entries(mut self, entries: usize) -> Self {
        self.entries = entries;
        self
    }

    /// Set the initial per-entry allocation size, in bytes.
    pub fn initial_size(mut self, bytes: usize) -> Self {
        self.initial_size = bytes;
        self
    }

    /// Set the cache's own logging verbosity ceiling.
    pub fn log_level(mut self, level: log::LevelFilter) -> Self {
        self.log_level = level;
        self
    }
}
