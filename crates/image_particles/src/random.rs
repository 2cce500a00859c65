//! Random draws from an injected generator.
use rand::Rng;

/// Generate a random float in the range [0, 1).
#[inline]
pub(crate) fn rand01(rng: &mut dyn Rng) -> f32 {
    // 24 random bits fill the f32 mantissa exactly, so the result never rounds up to 1.0.
    (rng.next_u32() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
}

/// Generate a random float in `[min, max)`, or `min` when the range is empty.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn Rng, min: f32, max: f32) -> f32 {
    min + rand01(rng) * (max - min)
}
