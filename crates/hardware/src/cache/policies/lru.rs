//! Least Recently Used (LRU) Replacement Policy.
//!
//! Evicts the line with the oldest last-access timestamp. Timestamps are the
//! simulation cycle of the line's install or latest hit, so ties are possible
//! when several lines were touched in the same cycle; the lowest way index
//! wins a tie.
//!
//! # Performance
//!
//! - **Time Complexity:** `victim()` is O(W) where W is the associativity
//! - **Space Complexity:** none beyond the per-line timestamp kept by the cache

use super::ReplacementPolicy;
use crate::cache::{CacheLine, CacheSet};
use crate::common::data::CoreId;

/// LRU policy. Stateless; the timestamps live in the cache lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LruPolicy;

/// Returns the least recently used way among the lines accepted by `filter`.
///
/// Scans in way order and only replaces the candidate on a strictly older
/// timestamp, so the first of several equally old lines is returned.
/// Returns `None` when no line passes the filter.
pub fn lru_way(set: &CacheSet, filter: impl Fn(&CacheLine) -> bool) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (way, line) in set.lines().iter().enumerate() {
        if !filter(line) {
            continue;
        }
        match best {
            Some((_, time)) if line.last_access >= time => {}
            _ => best = Some((way, line.last_access)),
        }
    }
    best.map(|(way, _)| way)
}

impl ReplacementPolicy for LruPolicy {
    fn victim(&mut self, set: &CacheSet, _core: CoreId) -> usize {
        lru_way(set, |_| true).unwrap_or(0)
    }

    fn name(&self) -> &'static str {
        "LRU"
    }
}
