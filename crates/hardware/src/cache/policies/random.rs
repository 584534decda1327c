//! Random Replacement Policy.
//!
//! Evicts a uniformly random way. The generator is seeded once at
//! construction so a run is reproducible for a given seed.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::ReplacementPolicy;
use crate::cache::CacheSet;
use crate::common::data::CoreId;

/// Random Policy state.
#[derive(Debug, Clone)]
pub struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl RandomPolicy {
    /// Creates a random policy with its own generator.
    ///
    /// # Arguments
    ///
    /// * `seed` - Generator seed; equal seeds give equal victim sequences.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn victim(&mut self, set: &CacheSet, _core: CoreId) -> usize {
        self.rng.gen_range(0..set.ways().max(1))
    }

    fn name(&self) -> &'static str {
        "RANDOM"
    }
}
