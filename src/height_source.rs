//! Injectable randomness for height synthesis.
//!
//! Wraps `ChaCha8Rng` for cross-platform deterministic terrain. Closures
//! returning `f32` also work, which keeps tests free to script exact
//! sequences.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed used when no explicit seed is provided.
pub const DEFAULT_SEED: u64 = 42;

/// Source of displacement samples in `[0, 1)`.
pub trait HeightSource {
    fn next_unit(&mut self) -> f32;
}

impl<F> HeightSource for F
where
    F: FnMut() -> f32,
{
    fn next_unit(&mut self) -> f32 {
        self()
    }
}

/// Seeded generator for reproducible terrain.
#[derive(Clone, Debug)]
pub struct SeededHeights(pub ChaCha8Rng);

impl Default for SeededHeights {
    fn default() -> Self {
        Self::from_seed_u64(DEFAULT_SEED)
    }
}

impl SeededHeights {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl HeightSource for SeededHeights {
    fn next_unit(&mut self) -> f32 {
        self.0.gen::<f32>()
    }
}
