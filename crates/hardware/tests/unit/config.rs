//! # Configuration Tests
//!
//! Verifies built-in defaults, JSON parsing with partial input, mode and
//! policy aliases, file loading and cross-field validation.

use std::io::Write;

use memsim_core::common::ConfigError;
use memsim_core::config::{CacheConfig, Config, PagePolicy, ReplacementPolicy, SimMode};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn default_geometry_and_timing() {
    let config = Config::default();
    assert_eq!(config.general.mode, SimMode::RowBuffer);
    assert_eq!(config.general.num_cores, 1);
    assert_eq!(config.general.swp_core0_ways, 2);
    assert_eq!(config.cache.line_bytes, 64);
    assert_eq!(
        config.cache.l1_i,
        CacheConfig {
            size_bytes: 32 * 1024,
            ways: 8,
            latency: 1
        }
    );
    assert_eq!(config.cache.l1_d, CacheConfig::dcache());
    assert_eq!(
        config.cache.l2,
        CacheConfig {
            size_bytes: 1024 * 1024,
            ways: 16,
            latency: 10
        }
    );
    assert_eq!(config.dram.page_policy, PagePolicy::OpenPage);
    assert_eq!(config.dram.banks, 16);
    assert_eq!(config.dram.row_buffer_bytes, 1024);
    assert_eq!(
        (config.dram.t_act, config.dram.t_cas, config.dram.t_pre, config.dram.t_bus),
        (45, 45, 45, 10)
    );
    assert_eq!(config.dram.fixed_latency, 100);
    assert!(config.validate().is_ok());
}

#[test]
fn empty_json_is_the_default_config() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.cache.l2, Config::default().cache.l2);
    assert_eq!(config.dram, Config::default().dram);
}

// ══════════════════════════════════════════════════════════
// 2. Parsing
// ══════════════════════════════════════════════════════════

#[test]
fn partial_cache_level_keeps_other_fields_default() {
    let config = Config::from_json_str(r#"{ "cache": { "l2": { "ways": 8 } } }"#).unwrap();
    assert_eq!(config.cache.l2.ways, 8);
    assert_eq!(config.cache.l2.size_bytes, 32 * 1024);
    assert_eq!(config.cache.l1_i, CacheConfig::icache());
}

#[rstest]
#[case("A", SimMode::Functional)]
#[case("B", SimMode::FixedLatency)]
#[case("C", SimMode::RowBuffer)]
#[case("DEF", SimMode::MultiCore)]
#[case("E", SimMode::MultiCore)]
#[case("FixedLatency", SimMode::FixedLatency)]
fn mode_aliases(#[case] name: &str, #[case] expected: SimMode) {
    let cores = if expected == SimMode::MultiCore { 2 } else { 1 };
    let json = format!(r#"{{ "general": {{ "mode": "{name}", "num_cores": {cores} }} }}"#);
    assert_eq!(Config::from_json_str(&json).unwrap().general.mode, expected);
}

#[rstest]
#[case("LRU", ReplacementPolicy::Lru)]
#[case("RANDOM", ReplacementPolicy::Random)]
#[case("Swp", ReplacementPolicy::Swp)]
#[case("DWP", ReplacementPolicy::Dwp)]
#[case("0", ReplacementPolicy::Lru)]
#[case("1", ReplacementPolicy::Random)]
#[case("2", ReplacementPolicy::Swp)]
#[case("3", ReplacementPolicy::Dwp)]
fn policy_names(#[case] name: &str, #[case] expected: ReplacementPolicy) {
    let json = format!(r#"{{ "cache": {{ "l1_policy": "{name}" }} }}"#);
    assert_eq!(Config::from_json_str(&json).unwrap().cache.l1_policy, expected);
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(Config::from_json_str("{ general"), Err(ConfigError::Json(_))));
    assert!(matches!(
        Config::from_json_str(r#"{ "general": { "mode": "Z" } }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{ "dram": {{ "page_policy": "ClosePage", "banks": 8 }} }}"#).unwrap();

    let config = Config::from_json_file(file.path()).unwrap();
    assert_eq!(config.dram.page_policy, PagePolicy::ClosePage);
    assert_eq!(config.dram.banks, 8);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::from_json_file(dir.path().join("absent.json"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

// ══════════════════════════════════════════════════════════
// 3. Validation
// ══════════════════════════════════════════════════════════

#[test]
fn single_core_modes_reject_several_cores() {
    let err = Config::from_json_str(r#"{ "general": { "mode": "C", "num_cores": 2 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::UnsupportedCoreCount {
            mode: "RowBuffer",
            cores: 2
        }
    ));
}

#[test]
fn zero_cores_rejected_in_every_mode() {
    let err = Config::from_json_str(r#"{ "general": { "mode": "DEF", "num_cores": 0 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedCoreCount { cores: 0, .. }));
}

#[test]
fn swp_quota_must_fit_the_partitioned_cache() {
    let json = r#"{
        "general": { "mode": "DEF", "num_cores": 2, "swp_core0_ways": 17 },
        "cache": { "l2_policy": "SWP" }
    }"#;
    assert!(matches!(
        Config::from_json_str(json),
        Err(ConfigError::QuotaExceedsWays { quota: 17, ways: 16 })
    ));
}

#[test]
fn too_many_ways_rejected() {
    let json = r#"{ "cache": { "l1_d": { "size_bytes": 65536, "ways": 32 } } }"#;
    assert!(matches!(
        Config::from_json_str(json),
        Err(ConfigError::TooManyWays { ways: 32, max: 16 })
    ));
}

#[test]
fn l2_policy_applies_only_in_multicore() {
    let mut config = Config::default();
    config.cache.l1_policy = ReplacementPolicy::Random;
    config.cache.l2_policy = ReplacementPolicy::Dwp;
    assert_eq!(config.l2_policy(), ReplacementPolicy::Random);

    config.general.mode = SimMode::MultiCore;
    assert_eq!(config.l2_policy(), ReplacementPolicy::Dwp);
}
