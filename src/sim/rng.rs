//! Seeded random source
//!
//! Every random decision in the simulation (spawn positions, obstacle and
//! power-up kinds, particle jitter) draws from one `SimRng`, so a run is fully
//! reproducible from its seed.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// The simulation's single random-number source
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this source was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in `[lo, hi)`; returns `lo` for an empty range
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.inner.random_range(lo..hi)
    }

    /// Uniform index in `0..len` (`len` must be non-zero)
    pub fn index(&mut self, len: usize) -> usize {
        self.inner.random_range(0..len)
    }

    /// Bernoulli trial with probability `p` (clamped to `[0, 1]`)
    pub fn chance(&mut self, p: f64) -> bool {
        self.inner.random_bool(p.clamp(0.0, 1.0))
    }

    /// Pick one element uniformly
    pub fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            None
        } else {
            Some(items[self.index(items.len())])
        }
    }
}
