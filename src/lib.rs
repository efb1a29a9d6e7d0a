//! `pixelcache`: the fixed-capacity pixel-buffer cache behind an
//! interactive raw photo editor's preview pipe.
//!
//! The editor's darkroom view renders a preview by running a chain of
//! image-processing modules ("the pipe") over a float-image buffer. Only the
//! suffix of the pipe downstream of a changed parameter needs
//! recomputation; this crate is the store that lets upstream intermediate
//! results (seconds of CPU per megapixel to recompute) be reused across
//! pipe runs.
//!
//! Three pieces compose:
//!
//! - [`fingerprint`] derives the `(basichash, hash)` pair identifying a
//!   pipeline state from a read-only [`pipe::Pipe`] view.
//! - [`cache::PixelCache`] is the fixed-size, weight-aged store keyed by
//!   that pair.
//! - [`roi`] and [`descriptor`] are the small value types threaded between
//!   them.

#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fingerprint;
pub mod pipe;
pub mod roi;

pub use cache::PixelCache;
pub use config::CacheConfig;
pub use descriptor::Dsc;
pub use error::CacheError;
pub use roi::Roi;
