//! Buffer descriptor: the opaque, copyable metadata the cache stores
//! alongside each raw buffer.

/// Raw sensor filter mosaic pattern a buffer was produced under.
///
/// Mirrors the handful of patterns a rawprepare-style module needs to carry
/// downstream; the cache never interprets this value, only stores and
/// returns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterPattern {
    /// No color filter array (monochrome, or already demosaiced).
    #[default]
    None,
    /// Bayer-style four-way repeating pattern, encoded as a raw tag.
    Bayer(u32),
    /// X-Trans-style six-by-six repeating pattern.
    XTrans,
}

/// Element type of a buffer's samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleKind {
    /// Single-precision float samples (the common case downstream of
    /// `rawprepare`).
    #[default]
    F32,
    /// Unsigned 16-bit integer samples (pre-demosaic raw data).
    U16,
}

/// Per-buffer metadata copied into and out of the cache.
///
/// `Dsc` is an opaque value type from the cache's point of view: it is
/// copied on write and handed back by reference on read, never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Dsc {
    /// Number of interleaved channels (1 for mono/raw, 3-4 for RGB/RGBA).
    pub channels: u8,
    /// Element type of each sample.
    pub sample_kind: SampleKind,
    /// Sensor filter mosaic pattern, if any.
    pub filters: FilterPattern,
    /// Raw black level, as reported by the sensor metadata.
    pub black: f32,
    /// Raw white level, as reported by the sensor metadata.
    pub white: f32,
}

impl Dsc {
    /// A descriptor with no meaningful metadata, used to initialize empty
    /// entries at cache construction.
    pub const EMPTY: Self = Self {
        channels: 0,
        sample_kind: SampleKind::F32,
        filters: FilterPattern::None,
        black: 0.0,
        white: 0.0,
    };
}
