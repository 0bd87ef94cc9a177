//! Randomness and numeric helpers shared by both search engines.
//!
//! The search never touches a process-wide generator. Every engine (and in
//! parallel mode every worker) owns its own [`RandomSource`], so a run is
//! reproducible from its seed alone.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seedable uniform generator for reals and integers.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    /// Generator with an explicit seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generator seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Generator for parallel worker `index`, seeded as `base + index`.
    ///
    /// The parallel stream therefore depends on the worker count: runs are
    /// only bit-identical when both the base seed and the worker count match.
    pub fn for_worker(base: u64, index: usize) -> Self {
        Self::seeded(base.wrapping_add(index as u64))
    }

    /// Uniform real in `[min, max)`, or exactly `min` when the range is empty.
    ///
    /// Consumes one draw regardless of the range.
    pub fn uniform_real(&mut self, min: f64, max: f64) -> f64 {
        let r: f64 = self.rng.gen();
        min + r * (max - min)
    }

    /// Uniform integer in `[min, max_inclusive]`.
    pub fn uniform_int(&mut self, min: usize, max_inclusive: usize) -> usize {
        self.rng.gen_range(min..=max_inclusive)
    }

    /// Draw a fresh base seed, used to derive worker seeds.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Saturate `value` to the closed interval `[min, max]`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
