//! Configuration system for the memory hierarchy model.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the hierarchy. It provides:
//! 1. **Defaults:** Baseline geometry and timing constants (caches, DRAM, partitioning).
//! 2. **Structures:** Hierarchical config for general, cache and DRAM settings.
//! 3. **Enums:** Simulation mode, replacement policy and DRAM page policy.
//!
//! Configuration is supplied as JSON (see [`Config::from_json_str`]) or built
//! from `Config::default()`. Every field is optional in JSON and falls back to
//! its default.

use std::path::Path;

use serde::Deserialize;

use crate::common::constants::MAX_WAYS_PER_CACHE_SET;
use crate::common::error::ConfigError;

/// Default configuration constants for the model.
mod defaults {
    /// Cache line size in bytes.
    pub const CACHE_LINE: u64 = 64;

    /// L1 instruction cache size in bytes (32 KiB).
    pub const ICACHE_SIZE: u64 = 32 * 1024;

    /// L1 instruction cache associativity.
    pub const ICACHE_WAYS: usize = 8;

    /// L1 instruction cache hit latency in cycles.
    pub const ICACHE_HIT_LATENCY: u64 = 1;

    /// L1 data cache size in bytes (32 KiB).
    pub const DCACHE_SIZE: u64 = 32 * 1024;

    /// L1 data cache associativity.
    pub const DCACHE_WAYS: usize = 8;

    /// L1 data cache hit latency in cycles.
    pub const DCACHE_HIT_LATENCY: u64 = 1;

    /// Shared L2 size in bytes (1 MiB).
    pub const L2CACHE_SIZE: u64 = 1024 * 1024;

    /// Shared L2 associativity.
    pub const L2CACHE_WAYS: usize = 16;

    /// Shared L2 hit latency in cycles.
    pub const L2CACHE_HIT_LATENCY: u64 = 10;

    /// Number of cores.
    pub const NUM_CORES: usize = 1;

    /// Core 0 way quota under static way partitioning.
    pub const SWP_CORE0_WAYS: usize = 2;

    /// Number of DRAM banks.
    pub const DRAM_BANKS: u64 = 16;

    /// DRAM row buffer size in bytes.
    pub const ROW_BUFFER_SIZE: u64 = 1024;

    /// Activation latency (ACT, also known as RAS) in cycles.
    pub const DELAY_ACT: u64 = 45;

    /// Column selection latency (CAS) in cycles.
    pub const DELAY_CAS: u64 = 45;

    /// Precharge latency (PRE) in cycles.
    pub const DELAY_PRE: u64 = 45;

    /// Bus transfer latency in cycles, paid by every DRAM access.
    pub const DELAY_BUS: u64 = 10;

    /// Latency of every DRAM access in fixed-latency mode.
    pub const DELAY_FIXED: u64 = 100;
}

/// Which hierarchy is built and how DRAM is timed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum SimMode {
    /// Data cache only, no timing; instruction fetches are ignored.
    #[serde(alias = "A")]
    Functional,
    /// Single core I/D/L2 with a fixed-latency DRAM.
    #[serde(alias = "B")]
    FixedLatency,
    /// Single core I/D/L2 with a row-buffer DRAM.
    #[default]
    #[serde(alias = "C")]
    RowBuffer,
    /// Per-core I/D caches, shared L2, row-buffer DRAM and virtual addressing.
    #[serde(alias = "DEF", alias = "D", alias = "E", alias = "F")]
    MultiCore,
}

impl SimMode {
    /// Short name used in diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Functional => "Functional",
            Self::FixedLatency => "FixedLatency",
            Self::RowBuffer => "RowBuffer",
            Self::MultiCore => "MultiCore",
        }
    }
}

/// Cache replacement policy algorithms.
///
/// Selects the victim way once a set has no invalid way left. Besides the
/// names, the legacy numeric codes `"0"` to `"3"` are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Evict the least recently used line.
    #[default]
    #[serde(alias = "Lru", alias = "0")]
    Lru,
    /// Evict a uniformly random line.
    #[serde(alias = "Random", alias = "1")]
    Random,
    /// Static way partitioning between two cores.
    #[serde(alias = "Swp", alias = "2")]
    Swp,
    /// Utility-based dynamic way partitioning between two cores.
    #[serde(alias = "Dwp", alias = "3")]
    Dwp,
}

/// DRAM row buffer management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum PagePolicy {
    /// Keep the last row open; later accesses may hit in the row buffer.
    #[default]
    #[serde(alias = "OPEN_PAGE", alias = "Open")]
    OpenPage,
    /// Close the row after every access; every access pays ACT + CAS + BUS.
    #[serde(alias = "CLOSE_PAGE", alias = "Close")]
    ClosePage,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use memsim_core::config::{Config, PagePolicy, ReplacementPolicy, SimMode};
///
/// let json = r#"{
///     "general": { "mode": "DEF", "num_cores": 2, "swp_core0_ways": 4 },
///     "cache": {
///         "line_bytes": 64,
///         "l1_d": { "size_bytes": 32768, "ways": 8 },
///         "l2": { "size_bytes": 1048576, "ways": 16, "latency": 10 },
///         "l2_policy": "SWP"
///     },
///     "dram": { "page_policy": "ClosePage" }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.general.mode, SimMode::MultiCore);
/// assert_eq!(config.cache.l2_policy, ReplacementPolicy::Swp);
/// assert_eq!(config.dram.page_policy, PagePolicy::ClosePage);
/// assert_eq!(config.dram.banks, 16);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Mode, core count and policy parameters
    #[serde(default)]
    pub general: GeneralConfig,
    /// Cache hierarchy geometry
    #[serde(default)]
    pub cache: CacheHierarchyConfig,
    /// DRAM geometry and timing
    #[serde(default)]
    pub dram: DramConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// `ConfigError::Json` on malformed input, or any error from [`Config::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file cannot be read, otherwise as [`Config::from_json_str`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks cross-field constraints that individual constructors cannot see.
    ///
    /// Per-cache geometry is checked again by `Cache::new`.
    ///
    /// # Errors
    ///
    /// `UnsupportedCoreCount` when a single-core mode is asked for several
    /// cores (or any mode for zero), and `QuotaExceedsWays` when the static
    /// partition quota does not fit in a partitioned cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cores = self.general.num_cores;
        let mode = self.general.mode;
        if cores == 0 || (mode != SimMode::MultiCore && cores != 1) {
            return Err(ConfigError::UnsupportedCoreCount {
                mode: mode.name(),
                cores,
            });
        }

        let quota = self.general.swp_core0_ways;
        for (policy, ways) in [
            (self.l1_policy(), self.cache.l1_i.ways),
            (self.l1_policy(), self.cache.l1_d.ways),
            (self.l2_policy(), self.cache.l2.ways),
        ] {
            if policy == ReplacementPolicy::Swp && quota > ways {
                return Err(ConfigError::QuotaExceedsWays { quota, ways });
            }
            if ways > MAX_WAYS_PER_CACHE_SET {
                return Err(ConfigError::TooManyWays {
                    ways,
                    max: MAX_WAYS_PER_CACHE_SET,
                });
            }
        }
        Ok(())
    }

    /// Policy used by the L1 caches.
    pub const fn l1_policy(&self) -> ReplacementPolicy {
        self.cache.l1_policy
    }

    /// Policy used by the shared L2.
    ///
    /// Single-core timed modes share the L1 policy; only the multi-core
    /// hierarchy honours `l2_policy`.
    pub const fn l2_policy(&self) -> ReplacementPolicy {
        match self.general.mode {
            SimMode::MultiCore => self.cache.l2_policy,
            _ => self.cache.l1_policy,
        }
    }
}

/// General model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Hierarchy shape and DRAM timing mode
    #[serde(default)]
    pub mode: SimMode,

    /// Number of cores (must be 1 outside `MultiCore`)
    #[serde(default = "GeneralConfig::default_num_cores")]
    pub num_cores: usize,

    /// Seed for the RANDOM replacement policy
    #[serde(default)]
    pub seed: u64,

    /// Ways per set reserved for core 0 under static way partitioning
    #[serde(default = "GeneralConfig::default_swp_core0_ways")]
    pub swp_core0_ways: usize,
}

impl GeneralConfig {
    /// Returns the default core count.
    fn default_num_cores() -> usize {
        defaults::NUM_CORES
    }

    /// Returns the default core 0 quota.
    fn default_swp_core0_ways() -> usize {
        defaults::SWP_CORE0_WAYS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            mode: SimMode::default(),
            num_cores: defaults::NUM_CORES,
            seed: 0,
            swp_core0_ways: defaults::SWP_CORE0_WAYS,
        }
    }
}

/// Cache hierarchy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheHierarchyConfig {
    /// Line size shared by every cache in bytes
    #[serde(default = "CacheHierarchyConfig::default_line")]
    pub line_bytes: u64,
    /// L1 instruction cache (one per core)
    #[serde(default = "CacheConfig::icache")]
    pub l1_i: CacheConfig,
    /// L1 data cache (one per core)
    #[serde(default = "CacheConfig::dcache")]
    pub l1_d: CacheConfig,
    /// Shared L2 cache
    #[serde(default = "CacheConfig::l2")]
    pub l2: CacheConfig,
    /// Replacement policy of the L1 caches
    #[serde(default)]
    pub l1_policy: ReplacementPolicy,
    /// Replacement policy of the shared L2 in multi-core mode
    #[serde(default)]
    pub l2_policy: ReplacementPolicy,
}

impl CacheHierarchyConfig {
    /// Returns the default line size in bytes.
    fn default_line() -> u64 {
        defaults::CACHE_LINE
    }
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            line_bytes: defaults::CACHE_LINE,
            l1_i: CacheConfig::icache(),
            l1_d: CacheConfig::dcache(),
            l2: CacheConfig::l2(),
            l1_policy: ReplacementPolicy::default(),
            l2_policy: ReplacementPolicy::default(),
        }
    }
}

/// Individual cache level configuration.
///
/// Missing fields take the generic defaults below; the hierarchy-level
/// defaults (`icache`, `dcache`, `l2`) apply only when the whole level is
/// omitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size")]
    pub size_bytes: u64,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Hit latency in cycles
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,
}

impl CacheConfig {
    /// Default L1 instruction cache.
    pub const fn icache() -> Self {
        Self {
            size_bytes: defaults::ICACHE_SIZE,
            ways: defaults::ICACHE_WAYS,
            latency: defaults::ICACHE_HIT_LATENCY,
        }
    }

    /// Default L1 data cache.
    pub const fn dcache() -> Self {
        Self {
            size_bytes: defaults::DCACHE_SIZE,
            ways: defaults::DCACHE_WAYS,
            latency: defaults::DCACHE_HIT_LATENCY,
        }
    }

    /// Default shared L2.
    pub const fn l2() -> Self {
        Self {
            size_bytes: defaults::L2CACHE_SIZE,
            ways: defaults::L2CACHE_WAYS,
            latency: defaults::L2CACHE_HIT_LATENCY,
        }
    }

    /// Returns the default cache size in bytes.
    fn default_size() -> u64 {
        defaults::DCACHE_SIZE
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::DCACHE_WAYS
    }

    /// Returns the default hit latency in cycles.
    fn default_latency() -> u64 {
        defaults::DCACHE_HIT_LATENCY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::dcache()
    }
}

/// DRAM module configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DramConfig {
    /// Row buffer management policy
    #[serde(default)]
    pub page_policy: PagePolicy,

    /// Number of banks (power of two)
    #[serde(default = "DramConfig::default_banks")]
    pub banks: u64,

    /// Row buffer size in bytes (power of two, at least one line)
    #[serde(default = "DramConfig::default_row_buffer")]
    pub row_buffer_bytes: u64,

    /// Activation latency
    #[serde(default = "DramConfig::default_t_act")]
    pub t_act: u64,

    /// Column access latency
    #[serde(default = "DramConfig::default_t_cas")]
    pub t_cas: u64,

    /// Precharge latency
    #[serde(default = "DramConfig::default_t_pre")]
    pub t_pre: u64,

    /// Bus transfer latency
    #[serde(default = "DramConfig::default_t_bus")]
    pub t_bus: u64,

    /// Latency of every access in fixed-latency mode
    #[serde(default = "DramConfig::default_fixed_latency")]
    pub fixed_latency: u64,
}

impl DramConfig {
    /// Returns the default bank count.
    fn default_banks() -> u64 {
        defaults::DRAM_BANKS
    }

    /// Returns the default row buffer size in bytes.
    fn default_row_buffer() -> u64 {
        defaults::ROW_BUFFER_SIZE
    }

    /// Returns the default activation latency.
    fn default_t_act() -> u64 {
        defaults::DELAY_ACT
    }

    /// Returns the default column access latency.
    fn default_t_cas() -> u64 {
        defaults::DELAY_CAS
    }

    /// Returns the default precharge latency.
    fn default_t_pre() -> u64 {
        defaults::DELAY_PRE
    }

    /// Returns the default bus latency.
    fn default_t_bus() -> u64 {
        defaults::DELAY_BUS
    }

    /// Returns the default fixed-mode latency.
    fn default_fixed_latency() -> u64 {
        defaults::DELAY_FIXED
    }
}

impl Default for DramConfig {
    fn default() -> Self {
        Self {
            page_policy: PagePolicy::default(),
            banks: defaults::DRAM_BANKS,
            row_buffer_bytes: defaults::ROW_BUFFER_SIZE,
            t_act: defaults::DELAY_ACT,
            t_cas: defaults::DELAY_CAS,
            t_pre: defaults::DELAY_PRE,
            t_bus: defaults::DELAY_BUS,
            fixed_latency: defaults::DELAY_FIXED,
        }
    }
}
