//! Way-Partitioning Replacement Policies.
//!
//! Both policies split the ways of a set between core 0 and its peer (every
//! other core id is accounted as the peer). Given a split `p`, core 0 is
//! guaranteed `p` ways and the peer `ways - p`. A requesting core that is at
//! or under its quota while the peer is over quota evicts the peer's least
//! recently used line; otherwise it replaces its own least recently used line.
//!
//! - **Static (SWP):** `p` is a fixed configuration value.
//! - **Dynamic (DWP):** `p` is recomputed on every victim search as the split
//!   maximising the combined hit utility of the lines currently in the set.

use tracing::warn;

use super::ReplacementPolicy;
use super::lru::lru_way;
use crate::cache::{CacheLine, CacheSet};
use crate::common::data::CoreId;

/// Partition class of a core: 0 for core 0, 1 for every other core.
#[inline]
const fn class_of(core: CoreId) -> usize {
    if core == 0 { 0 } else { 1 }
}

/// Number of valid lines owned by each partition class.
pub fn occupancy(set: &CacheSet) -> [usize; 2] {
    let mut occ = [0usize; 2];
    for line in set.lines().iter().filter(|l| l.valid) {
        occ[class_of(line.owner)] += 1;
    }
    occ
}

/// Picks the victim for `core` under a split giving core 0 `core0_ways` ways.
pub fn partition_victim(set: &CacheSet, core: CoreId, core0_ways: usize) -> usize {
    let ways = set.ways();
    let core0_ways = core0_ways.min(ways);
    let quota = [core0_ways, ways - core0_ways];
    let occ = occupancy(set);

    let me = class_of(core);
    let peer = 1 - me;
    let from = if occ[me] <= quota[me] && occ[peer] > quota[peer] {
        peer
    } else {
        me
    };

    let owned_by = |line: &CacheLine| line.valid && class_of(line.owner) == from;
    lru_way(set, owned_by).unwrap_or_else(|| {
        warn!(
            core,
            from, "partition class owns no line in set; falling back to set-wide LRU"
        );
        lru_way(set, |_| true).unwrap_or(0)
    })
}

/// Computes the utility-maximising split of a set between the two classes.
///
/// Each class's utility curve is its lines' hit counts sorted in descending
/// order (stable for equal counts). For every split `p` in `1..ways` the
/// total utility is the sum of the top `p` entries of core 0's curve plus the
/// top `ways - p` entries of the peer's curve, missing ranks counting as zero.
/// The smallest split reaching the maximum is returned.
pub fn utility_partition(set: &CacheSet) -> usize {
    let ways = set.ways();
    let mut curves: [Vec<u64>; 2] = [Vec::new(), Vec::new()];
    for line in set.lines().iter().filter(|l| l.valid) {
        curves[class_of(line.owner)].push(line.hits);
    }
    for curve in &mut curves {
        curve.sort_by(|a, b| b.cmp(a));
    }

    let top = |curve: &[u64], n: usize| curve.iter().take(n).sum::<u64>();
    let mut best: Option<(usize, u64)> = None;
    for split in 1..ways {
        let utility = top(&curves[0], split) + top(&curves[1], ways - split);
        if best.is_none_or(|(_, u)| utility > u) {
            best = Some((split, utility));
        }
    }
    best.map_or(ways.min(1), |(split, _)| split)
}

/// Static way partitioning.
#[derive(Debug, Clone, Copy)]
pub struct StaticPartitionPolicy {
    core0_ways: usize,
}

impl StaticPartitionPolicy {
    /// Creates a policy reserving `core0_ways` ways per set for core 0.
    pub const fn new(core0_ways: usize) -> Self {
        Self { core0_ways }
    }
}

impl ReplacementPolicy for StaticPartitionPolicy {
    fn victim(&mut self, set: &CacheSet, core: CoreId) -> usize {
        partition_victim(set, core, self.core0_ways)
    }

    fn name(&self) -> &'static str {
        "SWP"
    }
}

/// Utility-based dynamic way partitioning.
///
/// Stateless: the split is derived from the set contents on each search.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicPartitionPolicy;

impl ReplacementPolicy for DynamicPartitionPolicy {
    fn victim(&mut self, set: &CacheSet, core: CoreId) -> usize {
        partition_victim(set, core, utility_partition(set))
    }

    fn name(&self) -> &'static str {
        "DWP"
    }
}
