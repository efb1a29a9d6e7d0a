//! The read-only pipe/module collaborator interface the fingerprint helpers
//! consume. The cache itself never touches these types, only
//! [`crate::fingerprint`] does: a [`crate::cache::PixelCache`] never sees a
//! `Pipe`, only the `u64`s derived from one.

/// Which kind of pipe a fingerprint was computed for.
///
/// Distinguishes preview/full/export pipes so that otherwise-identical
/// module chains running in different pipe contexts never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipeKind {
    /// The interactive darkroom preview pipe.
    Preview,
    /// The full-resolution pipe used for thumbnails and export previews.
    Full,
    /// The pipe used to render a final export.
    Export,
}

/// One stage of the pipe.
///
/// Identified by operation name, instance, and version; carries its own
/// parameter and blend blobs plus an enable flag. Implementations are
/// provided by the host; this crate only reads through the trait.
pub trait Module {
    /// Stable name of the operation this module performs (e.g. `"exposure"`).
    fn op_name(&self) -> &str;
    /// Disambiguates multiple instances of the same operation in one pipe.
    fn instance(&self) -> i32;
    /// Module version; bumped when the parameter blob's meaning changes.
    fn version(&self) -> i32;
    /// Whether this module currently contributes to the pipe's output.
    fn enabled(&self) -> bool;
    /// Serialized parameters, opaque to the cache.
    fn param_blob(&self) -> &[u8];
    /// Serialized blend parameters, opaque to the cache.
    fn blend_blob(&self) -> &[u8];
}

/// A read-only view of the pipe's ordered module list.
///
/// The cache's fingerprint helpers index into this by position; `len`
/// governs the valid range for `k` in [`crate::fingerprint::basichash`].
pub trait Pipe {
    /// Which kind of pipe this is (preview/full/export).
    fn kind(&self) -> PipeKind;
    /// Number of modules currently in the pipe's ordering.
    fn len(&self) -> usize;
    /// Whether the pipe currently has no modules at all.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Module at position `index`, if any.
    fn module(&self, index: usize) -> Option<&dyn Module>;
}

/// Effective preview dimensions rawprepare reports downstream.
///
/// Purely a data carrier; the cache does not hold one of these, it only
/// consumes the boolean result of [`geometry_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryChange {
    /// Width/height before the rawprepare crop or rotation was applied.
    pub previous: (u32, u32),
    /// Width/height after.
    pub next: (u32, u32),
}

/// Whether rawprepare's crop/rotation actually changed the effective
/// preview dimensions.
///
/// A metadata-update signal should be raised by the host only when this
/// returns `true`; when dimensions are unchanged, downstream ROIs are
/// unchanged and the cache's `hash` values naturally stay valid without any
/// explicit invalidation call.
pub fn geometry_changed(prev: (u32, u32), next: (u32, u32)) -> bool {
    prev != next
}
