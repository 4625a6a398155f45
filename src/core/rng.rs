//! Game-style random draws
//!
//! Scripts and tie-breaks consume 16-bit values one at a time. Every draw
//! goes through [`random`] so the consumption order stays identical for a
//! given seed.

use rand::RngCore;

/// Draw one 16-bit random value
pub fn random(rng: &mut dyn RngCore) -> u16 {
    (rng.next_u32() >> 16) as u16
}

/// Uniform index in `0..len` using a single draw (`random % len`)
pub fn random_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0);
    random(rng) as usize % len.max(1)
}
