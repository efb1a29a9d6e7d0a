//! Pure fingerprint derivation: hashing a mutable chain of pipe modules
//! into the two 64-bit identifiers the cache is keyed by.
//!
//! The mixer is a non-cryptographic FNV-1a variant, generalized from a
//! single `&str` hash to a sequence of heterogeneous fields folded in order.

use crate::pipe::{Module, Pipe, PipeKind};
use crate::roi::Roi;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Order-sensitive, collision-resistant-enough-for-cache-keys mixer.
///
/// Not cryptographic: realistic parameter edits must produce different
/// hashes, but adversarial inputs are not a concern for this crate.
struct Mixer(u64);

impl Mixer {
    const fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_i64(&mut self, v: i64) {
        self.write_u64(v as u64);
    }

    fn write_i32(&mut self, v: i32) {
        self.write_u64(v as i64 as u64);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_bytes(&[v as u8]);
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn finish(self) -> u64 {
        self.0
    }
}

fn pipe_kind_tag(kind: PipeKind) -> u64 {
    match kind {
        PipeKind::Preview => 0,
        PipeKind::Full => 1,
        PipeKind::Export => 2,
    }
}

/// Combines the image identifier, pipe-type tag, and every enabled module
/// at position `< k` into one 64-bit identifier of "the logical intermediate
/// at position k of the pipe".
///
/// Modules at or beyond `k` do not contribute at all. A disabled module at
/// a position `< k` contributes only a marker, never its name, instance,
/// version, or parameter blobs, so two pipes differing only in a disabled
/// module's parameters fingerprint identically. Order matters: reordering
/// two enabled modules at positions `< k` changes the result.
pub fn basichash(imgid: i64, pipe: &dyn Pipe, k: usize) -> u64 {
    let mut m = Mixer::new();
    m.write_i64(imgid);
    m.write_u64(pipe_kind_tag(pipe.kind()));

    let limit = k.min(pipe.len());
    for i in 0..limit {
        let Some(module) = pipe.module(i) else {
            continue;
        };
        if !module.enabled() {
            // Still folded in below via `write_bool`, but the module's
            // identity fields are skipped: a disabled module contributes no
            // pixels, so two pipes differing only in a disabled module's
            // parameters must fingerprint identically.
            m.write_bool(false);
            continue;
        }
        m.write_bytes(module.op_name().as_bytes());
        m.write_i32(module.instance());
        m.write_i32(module.version());
        m.write_bytes(module.param_blob());
        m.write_bytes(module.blend_blob());
        m.write_bool(true);
    }
    m.finish()
}

/// `basichash(imgid, pipe, k)` further combined with the four integer
/// fields of `roi` and its scale. Identifies a concrete pixel buffer rather
/// than a logical intermediate.
pub fn hash(imgid: i64, roi: &Roi, pipe: &dyn Pipe, k: usize) -> u64 {
    let basic = basichash(imgid, pipe, k);
    let mut m = Mixer::new();
    m.write_u64(basic);
    m.write_i32(roi.x);
    m.write_i32(roi.y);
    m.write_i32(roi.width);
    m.write_i32(roi.height);
    m.write_f64(roi.scale);
    m.finish()
}

/// Single call returning both the basic hash and the full hash, avoiding
/// recomputation of the shared prefix.
pub fn fullhash_pair(imgid: i64, roi: &Roi, pipe: &dyn Pipe, k: usize) -> (u64, u64) {
    let basic = basichash(imgid, pipe, k);
    let mut m = Mixer::new();
    m.write_u64(basic);
    m.write_i32(roi.x);
    m.write_i32(roi.y);
    m.write_i32(roi.width);
    m.write_i32(roi.height);
    m.write_f64(roi.scale);
    (basic, m.finish())
}

/// Out-parameter form mandated by the host's calling convention; prefer
/// [`fullhash_pair`] in new Rust code.
pub fn fullhash(imgid: i64, roi: &Roi, pipe: &dyn Pipe, k: usize, out_basic: &mut u64, out_full: &mut u64) {
    let (basic, full) = fullhash_pair(imgid, roi, pipe, k);
    *out_basic = basic;
    *out_full = full;
}

/// Returns the basic hash at the position one past the last **enabled**
/// module strictly before `module_index` in the pipe's current ordering.
///
/// If no such module exists, returns the "input" hash (the basic hash at
/// `k = 0`).
pub fn basichash_prior(imgid: i64, pipe: &dyn Pipe, module_index: usize) -> u64 {
    let mut last_enabled = None;
    for i in 0..module_index.min(pipe.len()) {
        if pipe.module(i).is_some_and(Module::enabled) {
            last_enabled = Some(i);
        }
    }
    let k = last_enabled.map_or(0, |i| i + 1);
    basichash(imgid, pipe, k)
}
