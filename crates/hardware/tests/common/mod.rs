//! Shared test infrastructure.

use memsim_core::cache::Cache;
use memsim_core::cache::policies::ReplacementPolicy;
use memsim_core::common::CoreId;
use memsim_core::config::{CacheConfig, Config, SimMode};
use tracing_subscriber::EnvFilter;

/// Line size used by every test fixture.
pub const LINE: u64 = 64;

/// Routes `tracing` output to the test harness; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fully associative cache: one set of `ways` lines, so a line address is its own tag.
pub fn single_set_cache(ways: usize, policy: Box<dyn ReplacementPolicy>) -> Cache {
    Cache::new(ways as u64 * LINE, ways, LINE, policy).unwrap()
}

/// Installs `(line_addr, core, now)` triples as clean lines, asserting no eviction.
pub fn fill(cache: &mut Cache, lines: &[(u64, CoreId, u64)]) {
    for &(line_addr, core, now) in lines {
        let outcome = cache.install(line_addr, false, core, now);
        assert_eq!(outcome.evicted, None, "fill of {line_addr:#x} evicted a line");
    }
}

/// Probes a line `times` times for `core`, starting at cycle `now`.
pub fn hit(cache: &mut Cache, line_addr: u64, core: CoreId, times: u64, now: u64) {
    for i in 0..times {
        assert!(cache.probe(line_addr, false, core, now + i).is_hit());
    }
}

/// Default configuration in the given mode.
pub fn config(mode: SimMode) -> Config {
    let mut config = Config::default();
    config.general.mode = mode;
    config
}

/// Configuration whose L1-D and L2 hold a single line each, so every
/// reference to a new line evicts the previous one.
pub fn one_line_config(mode: SimMode) -> Config {
    let one_line = CacheConfig {
        size_bytes: LINE,
        ways: 1,
        latency: 0,
    };
    let mut config = config(mode);
    config.cache.l1_d = CacheConfig {
        latency: 1,
        ..one_line
    };
    config.cache.l2 = CacheConfig {
        latency: 10,
        ..one_line
    };
    config
}
