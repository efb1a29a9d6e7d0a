//! Error types for the pixel cache.

use thiserror::Error;

/// Errors the cache itself can produce.
///
/// Per the cache's failure-semantics contract, this is deliberately small:
/// the cache never retries and never classifies failures beyond "couldn't
/// grow a buffer". Broader taxonomies (corrupted / not-found / cache-full)
/// belong to surrounding collaborators, not to this crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CacheError {
    /// The initial N buffers could not be allocated at construction time.
    #[error("failed to allocate {requested} bytes for cache entry {entry}")]
    Alloc {
        /// Index of the entry that failed to allocate.
        entry: usize,
        /// Byte size that was requested.
        requested: usize,
    },

    /// A lookup needed to grow an existing entry's buffer and the
    /// allocator reported failure. The cache is left unchanged.
    #[error("failed to grow cache entry {entry} from {from} to {to} bytes")]
    Grow {
        /// Index of the victim entry that could not grow.
        entry: usize,
        /// Previous byte size.
        from: usize,
        /// Byte size that was requested.
        to: usize,
    },

    /// `CacheConfig` described a cache with zero entries, which can never
    /// satisfy a `get`.
    #[error("cache must have at least one entry")]
    ZeroCapacity,
}
