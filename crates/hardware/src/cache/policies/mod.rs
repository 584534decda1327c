//! Cache Replacement Policies.
//!
//! Implements the victim-selection algorithms used once a set has no invalid
//! way left (the cache engine always fills empty ways first).
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used, by last-access timestamp.
//! - `Random`: Uniform random way from a seeded generator.
//! - `Swp`: Static way partitioning between core 0 and its peer.
//! - `Dwp`: Dynamic way partitioning driven by per-core utility curves.

/// Least Recently Used replacement policy.
pub mod lru;

/// Shared occupancy/quota logic for the way-partitioning policies.
pub mod partition;

/// Random replacement policy.
pub mod random;

pub use lru::LruPolicy;
pub use partition::{DynamicPartitionPolicy, StaticPartitionPolicy};
pub use random::RandomPolicy;

use std::fmt;

use super::CacheSet;
use crate::common::data::CoreId;
use crate::config::ReplacementPolicy as PolicyKind;

/// Trait for cache replacement policies.
///
/// Policies read the line metadata (timestamps, owners, hit counters) kept by
/// the cache itself, so there is no per-access update hook.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Selects the way to evict from a full set.
    ///
    /// # Arguments
    ///
    /// * `set` - The set being filled; every way is valid.
    /// * `core` - The core requesting the install.
    ///
    /// # Returns
    ///
    /// The index of the way to evict, always `< set.ways()`.
    fn victim(&mut self, set: &CacheSet, core: CoreId) -> usize;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// Parameters shared by the policy constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolicyParams {
    /// Seed of the RANDOM policy's generator.
    pub seed: u64,
    /// Ways per set guaranteed to core 0 under static partitioning.
    pub swp_core0_ways: usize,
}

/// Builds the policy object for a configured policy kind.
pub fn build(kind: PolicyKind, params: PolicyParams) -> Box<dyn ReplacementPolicy> {
    match kind {
        PolicyKind::Lru => Box::new(LruPolicy),
        PolicyKind::Random => Box::new(RandomPolicy::new(params.seed)),
        PolicyKind::Swp => Box::new(StaticPartitionPolicy::new(params.swp_core0_ways)),
        PolicyKind::Dwp => Box::new(DynamicPartitionPolicy),
    }
}
