//! Region-of-interest value type.

/// An integer rectangle plus a floating scale factor describing which
/// portion of the image a module will produce.
///
/// `Roi` is a plain value type: the cache never mutates one, only folds its
/// fields into a [`crate::fingerprint::hash`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    /// Left edge, in pixels, of the region within the full image.
    pub x: i32,
    /// Top edge, in pixels, of the region within the full image.
    pub y: i32,
    /// Width of the region, in pixels.
    pub width: i32,
    /// Height of the region, in pixels.
    pub height: i32,
    /// Scale factor applied by the module producing this region (1.0 for
    /// full resolution, < 1.0 for a preview downscale, etc).
    pub scale: f64,
}

impl Roi {
    /// A full-resolution, unscaled, zero-origin region. Useful as a base
    /// case or for tests that do not care about geometry.
    pub const fn full(width: i32, height: i32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
            scale: 1.0,
        }
    }
}
