use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Create a deterministic StdRng from a u64 seed.
/// Every generator takes its randomness from an rng built here, so a fixed
/// seed reproduces the same city.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Seed for a fresh world when none is configured.
pub fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed_9ac4_7001)
}

/// `lo + u * (hi - lo)` with `u` in `[0, 1)`; a degenerate range returns `lo`.
pub fn lerp_range(rng: &mut StdRng, lo: f32, hi: f32) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

/// Uniform in `[-half, half)`.
pub fn jitter(rng: &mut StdRng, half: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * 2.0 * half
}

/// True with probability `p`.
pub fn chance(rng: &mut StdRng, p: f32) -> bool {
    rng.random::<f32>() < p
}
