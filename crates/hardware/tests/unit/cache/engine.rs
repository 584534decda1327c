//! # Cache Engine Tests
//!
//! Verifies geometry validation, probe/install semantics (hit tracking,
//! dirty marking, owner matching), victim reconstruction and statistics.
//! A property test checks the occupancy invariants under random streams.

use memsim_core::cache::policies::{LruPolicy, RandomPolicy};
use memsim_core::cache::{Cache, CacheResult, CacheStats, EvictedLine};
use memsim_core::common::ConfigError;
use proptest::prelude::*;

use crate::common::{LINE, fill, single_set_cache};

/// 4 sets of 4 ways.
fn small_cache() -> Cache {
    Cache::new(1024, 4, LINE, Box::new(LruPolicy)).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Geometry
// ══════════════════════════════════════════════════════════

#[test]
fn derives_sets_and_bit_widths() {
    let cache = Cache::new(32 * 1024, 8, LINE, Box::new(LruPolicy)).unwrap();
    assert_eq!(cache.num_sets(), 64);
    assert_eq!(cache.num_ways(), 8);
    assert_eq!(cache.index_bits(), 6);
    assert_eq!(cache.tag_bits(), 58);
    assert_eq!(cache.policy_name(), "LRU");
    assert!(cache.sets().iter().all(|s| s.valid_count() == 0));
}

#[test]
fn rejects_invalid_geometry() {
    let build = |size, ways, line| Cache::new(size, ways, line, Box::new(LruPolicy));

    assert!(matches!(build(1024, 0, LINE), Err(ConfigError::ZeroGeometry { .. })));
    assert!(matches!(build(17 * LINE, 17, LINE), Err(ConfigError::TooManyWays { ways: 17, max: 16 })));
    assert!(matches!(build(1000, 4, LINE), Err(ConfigError::SizeNotDivisible { .. })));
    assert!(matches!(build(3 * 4 * LINE, 4, LINE), Err(ConfigError::NotPowerOfTwo { value: 3, .. })));
    assert!(matches!(build(4 * 48, 4, 48), Err(ConfigError::NotPowerOfTwo { value: 48, .. })));
    assert!(matches!(build(0, 4, LINE), Err(ConfigError::ZeroGeometry { .. })));
    assert!(matches!(
        build(1 << 63, 2, 1 << 63),
        Err(ConfigError::SetSizeOverflow { ways: 2, line }) if line == 1 << 63
    ));
}

// ══════════════════════════════════════════════════════════
// 2. Probe and install
// ══════════════════════════════════════════════════════════

#[test]
fn cold_probe_misses_then_hits_after_install() {
    let mut cache = small_cache();
    assert_eq!(cache.probe(0x10, false, 0, 0), CacheResult::Miss);
    let outcome = cache.install(0x10, false, 0, 0);
    assert_eq!(outcome.evicted, None);
    assert_eq!(cache.probe(0x10, false, 0, 1), CacheResult::Hit);

    let line = cache.sets()[0].lines()[outcome.way];
    assert!(line.valid);
    assert!(!line.dirty);
    assert_eq!(line.last_access, 1);
    assert_eq!(line.hits, 1);
}

#[test]
fn write_hit_marks_line_dirty() {
    let mut cache = small_cache();
    let way = cache.install(0x10, false, 0, 0).way;
    assert!(cache.probe(0x10, true, 0, 1).is_hit());
    assert!(cache.sets()[0].lines()[way].dirty);
}

#[test]
fn lines_only_hit_for_their_owner() {
    let mut cache = small_cache();
    let _ = cache.install(0x10, false, 0, 0);
    assert!(cache.contains(0x10, 0));
    assert!(!cache.contains(0x10, 1));
    assert_eq!(cache.probe(0x10, false, 1, 1), CacheResult::Miss);
}

#[test]
fn invalid_ways_fill_before_any_eviction() {
    let mut cache = small_cache();
    // Lines 0, 4, 8, 12 all map to set 0.
    let ways: Vec<_> = [0u64, 4, 8, 12]
        .iter()
        .map(|&line| {
            let outcome = cache.install(line, false, 0, line);
            assert_eq!(outcome.evicted, None);
            outcome.way
        })
        .collect();
    assert_eq!(ways, [0, 1, 2, 3]);
    assert_eq!(cache.sets()[0].valid_count(), 4);
    assert_eq!(cache.sets()[1].valid_count(), 0);

    // The fifth line of the set has to displace a valid one.
    let outcome = cache.install(16, false, 0, 16);
    assert_eq!(outcome.evicted.map(|e| e.line_addr), Some(0));
    assert_eq!(outcome.way, 0);
    assert_eq!(cache.sets()[0].valid_count(), 4);
}

#[test]
fn eviction_reports_victim_address() {
    let mut cache = small_cache();
    // All in set 3; the first one is the least recently used.
    fill(&mut cache, &[(0x123, 0, 0), (0x127, 0, 1), (0x12b, 0, 2), (0x12f, 0, 3)]);

    let outcome = cache.install(0x133, false, 1, 4);
    assert_eq!(
        outcome.evicted,
        Some(EvictedLine {
            line_addr: 0x123,
            dirty: false,
            owner: 0
        })
    );
    assert_eq!(outcome.writeback(), None);
    assert!(!cache.contains(0x123, 0));
}

#[test]
fn dirty_victim_requires_writeback() {
    let mut cache = single_set_cache(2, Box::new(LruPolicy));
    let _ = cache.install(7, true, 0, 0);
    let _ = cache.install(9, false, 0, 1);

    let outcome = cache.install(11, false, 0, 2);
    assert_eq!(outcome.writeback(), Some(7));
    assert_eq!(cache.stats().dirty_evicts, 1);

    // A clean victim does not count.
    let outcome = cache.install(13, false, 0, 3);
    assert_eq!(outcome.writeback(), None);
    assert_eq!(cache.stats().dirty_evicts, 1);
}

#[test]
fn write_install_is_dirty() {
    let mut cache = small_cache();
    let way = cache.install(0x20, true, 2, 5).way;
    let line = cache.sets()[0].lines()[way];
    assert!(line.dirty);
    assert_eq!(line.owner, 2);
    assert_eq!(line.last_access, 5);
    assert_eq!(line.hits, 0);
}

// ══════════════════════════════════════════════════════════
// 3. Statistics
// ══════════════════════════════════════════════════════════

#[test]
fn probe_counters_split_reads_and_writes() {
    let mut cache = small_cache();
    let _ = cache.probe(0x10, false, 0, 0);
    let _ = cache.install(0x10, false, 0, 0);
    let _ = cache.probe(0x10, false, 0, 1);
    let _ = cache.probe(0x10, true, 0, 2);
    let _ = cache.probe(0x11, true, 0, 3);

    assert_eq!(
        *cache.stats(),
        CacheStats {
            read_access: 2,
            write_access: 2,
            read_miss: 1,
            write_miss: 1,
            dirty_evicts: 0
        }
    );
    assert!((cache.stats().read_miss_percent() - 50.0).abs() < f64::EPSILON);
    assert!((cache.stats().write_miss_percent() - 50.0).abs() < f64::EPSILON);
}

#[test]
fn miss_percentages_are_zero_without_accesses() {
    let stats = CacheStats::default();
    assert!(stats.read_miss_percent().abs() < f64::EPSILON);
    assert!(stats.write_miss_percent().abs() < f64::EPSILON);
}

#[test]
fn set_miss_counter_tracks_its_set_only() {
    let mut cache = small_cache();
    let _ = cache.probe(0, false, 0, 0);
    let _ = cache.probe(4, false, 0, 1);
    let _ = cache.probe(1, false, 0, 2);
    assert_eq!(cache.sets()[0].misses(), 2);
    assert_eq!(cache.sets()[1].misses(), 1);
    assert_eq!(cache.sets()[2].misses(), 0);
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    /// Under any access stream a set never holds two copies of one
    /// `(tag, owner)` pair, and the accessed line is resident afterwards.
    #[test]
    fn occupancy_invariants_hold(
        seed in any::<u64>(),
        stream in prop::collection::vec((0u64..64, any::<bool>(), 0usize..2), 1..200)
    ) {
        let mut cache = Cache::new(1024, 4, LINE, Box::new(RandomPolicy::new(seed))).unwrap();
        for (now, &(line, is_write, core)) in stream.iter().enumerate() {
            let now = now as u64;
            if !cache.probe(line, is_write, core, now).is_hit() {
                let _ = cache.install(line, is_write, core, now);
            }
            prop_assert!(cache.contains(line, core));

            for set in cache.sets() {
                prop_assert!(set.valid_count() <= cache.num_ways());
                let valid: Vec<_> = set.lines().iter().filter(|l| l.valid).collect();
                for (i, a) in valid.iter().enumerate() {
                    for b in &valid[i + 1..] {
                        prop_assert!(a.tag != b.tag || a.owner != b.owner);
                    }
                }
            }
        }
    }
}
