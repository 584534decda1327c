//! Memory-System Orchestrator.
//!
//! This module wires the caches and the DRAM module into a hierarchy and
//! routes every reference through it. It provides:
//! 1. **Routing:** Instruction fetches to the instruction cache, loads and stores to the data cache.
//! 2. **Miss Handling:** L1 misses fetched from the shared L2, L2 misses fetched from DRAM.
//! 3. **Writebacks:** Dirty L1 victims written into L2, dirty L2 victims written to DRAM.
//! 4. **Translation:** Per-core virtual-to-physical mapping in multi-core mode.
//! 5. **Statistics:** Access count and cumulative delay per access type.
//!
//! Only the demand path is charged to the requester: the L1 latency, plus the
//! L2 latency on an L1 miss, plus the DRAM delay on an L2 miss. Writebacks
//! are performed immediately but off the critical path; they update the
//! target's state and statistics without adding to the returned delay.

/// Per-core virtual-to-physical page mapping.
pub mod translate;

use std::io::{self, Write};

use tracing::debug;

use self::translate::PageMapper;
use crate::cache::Cache;
use crate::cache::policies::PolicyParams;
use crate::common::addr::log2_exact;
use crate::common::data::{AccessType, CoreId, Cycle};
use crate::common::error::{AccessError, ConfigError};
use crate::config::{Config, SimMode};
use crate::dram::Dram;
use crate::stats::MemsysStats;

/// Private L1 caches of one core.
#[derive(Debug)]
pub struct CoreCaches {
    /// Instruction cache.
    pub icache: Cache,
    /// Data cache.
    pub dcache: Cache,
}

#[derive(Debug)]
enum Hierarchy {
    Functional {
        dcache: Cache,
    },
    Timed {
        cores: Vec<CoreCaches>,
        l2: Cache,
        dram: Dram,
    },
}

/// The memory hierarchy seen by the processor model.
///
/// Owns every cache and the DRAM module for its whole lifetime.
///
/// # Examples
///
/// ```
/// use memsim_core::common::AccessType;
/// use memsim_core::config::Config;
/// use memsim_core::memsys::MemorySystem;
///
/// let mut memsys = MemorySystem::new(&Config::default()).unwrap();
/// // Cold miss: L1 (1) + L2 (10) + DRAM in an idle bank (45 + 45 + 10).
/// assert_eq!(memsys.access(0x1000, AccessType::Load, 0, 0).unwrap(), 111);
/// // The line is now resident in the data cache.
/// assert_eq!(memsys.access(0x1008, AccessType::Load, 0, 1).unwrap(), 1);
/// ```
#[derive(Debug)]
pub struct MemorySystem {
    mode: SimMode,
    num_cores: usize,
    line_bits: u32,
    mapper: Option<PageMapper>,
    hierarchy: Hierarchy,
    stats: MemsysStats,
}

impl MemorySystem {
    /// Builds the hierarchy selected by `config.general.mode`.
    ///
    /// Every cache gets its own replacement policy instance; RANDOM
    /// generators are seeded with `general.seed` plus the cache's position
    /// in construction order.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from validation or from building a cache or the DRAM module.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = config.general.mode;
        let num_cores = config.general.num_cores;
        let line_bytes = config.cache.line_bytes;
        let line_bits = log2_exact(line_bytes, "cache line size")?;

        let mut ordinal = 0u64;
        let mut next_params = || {
            let params = PolicyParams {
                seed: config.general.seed.wrapping_add(ordinal),
                swp_core0_ways: config.general.swp_core0_ways,
            };
            ordinal += 1;
            params
        };

        let l1_policy = config.l1_policy();
        let hierarchy = if mode == SimMode::Functional {
            Hierarchy::Functional {
                dcache: Cache::from_config(&config.cache.l1_d, line_bytes, l1_policy, next_params())?,
            }
        } else {
            let mut cores = Vec::with_capacity(num_cores);
            for _ in 0..num_cores {
                cores.push(CoreCaches {
                    icache: Cache::from_config(&config.cache.l1_i, line_bytes, l1_policy, next_params())?,
                    dcache: Cache::from_config(&config.cache.l1_d, line_bytes, l1_policy, next_params())?,
                });
            }
            let l2 = Cache::from_config(&config.cache.l2, line_bytes, config.l2_policy(), next_params())?;
            let dram = Dram::new(&config.dram, line_bytes, mode == SimMode::FixedLatency)?;
            Hierarchy::Timed { cores, l2, dram }
        };

        debug!(mode = mode.name(), num_cores, line_bytes, "memory system constructed");

        Ok(Self {
            mode,
            num_cores,
            line_bits,
            mapper: (mode == SimMode::MultiCore).then(|| PageMapper::new(num_cores)),
            hierarchy,
            stats: MemsysStats::default(),
        })
    }

    /// Performs one reference and returns its delay in cycles.
    ///
    /// # Arguments
    ///
    /// * `addr` - Byte address; virtual in multi-core mode, physical otherwise.
    /// * `kind` - Instruction fetch, load or store.
    /// * `core` - Requesting core.
    /// * `now` - Current cycle, used to timestamp touched lines.
    ///
    /// # Errors
    ///
    /// `AccessError::CoreOutOfRange` if `core` has no caches in this hierarchy.
    pub fn access(&mut self, addr: u64, kind: AccessType, core: CoreId, now: Cycle) -> Result<u64, AccessError> {
        if core >= self.num_cores {
            return Err(AccessError::CoreOutOfRange {
                core,
                num_cores: self.num_cores,
            });
        }

        let paddr = self.mapper.map_or(addr, |m| m.translate(addr, core));
        let line_addr = paddr >> self.line_bits;

        let delay = match &mut self.hierarchy {
            Hierarchy::Functional { dcache } => {
                if kind != AccessType::Ifetch {
                    let is_write = kind.is_write();
                    if !dcache.probe(line_addr, is_write, core, now).is_hit() {
                        let _ = dcache.install(line_addr, is_write, core, now);
                    }
                }
                0
            }
            Hierarchy::Timed { cores, l2, dram } => {
                let caches = &mut cores[core];
                let l1 = match kind {
                    AccessType::Ifetch => &mut caches.icache,
                    AccessType::Load | AccessType::Store => &mut caches.dcache,
                };
                l1_access(l1, l2, dram, line_addr, kind.is_write(), core, now)
            }
        };

        self.stats.record(kind, delay);
        Ok(delay)
    }

    /// Selected mode.
    pub const fn mode(&self) -> SimMode {
        self.mode
    }

    /// Number of cores the hierarchy was built for.
    pub const fn num_cores(&self) -> usize {
        self.num_cores
    }

    /// `log2(line_bytes)`.
    pub const fn line_bits(&self) -> u32 {
        self.line_bits
    }

    /// Page mapper, present in multi-core mode only.
    pub const fn page_mapper(&self) -> Option<&PageMapper> {
        self.mapper.as_ref()
    }

    /// Per-type access statistics.
    pub const fn stats(&self) -> &MemsysStats {
        &self.stats
    }

    /// Instruction cache of `core`; `None` in functional mode.
    pub fn icache(&self, core: CoreId) -> Option<&Cache> {
        match &self.hierarchy {
            Hierarchy::Functional { .. } => None,
            Hierarchy::Timed { cores, .. } => cores.get(core).map(|c| &c.icache),
        }
    }

    /// Data cache of `core`.
    pub fn dcache(&self, core: CoreId) -> Option<&Cache> {
        match &self.hierarchy {
            Hierarchy::Functional { dcache } => (core == 0).then_some(dcache),
            Hierarchy::Timed { cores, .. } => cores.get(core).map(|c| &c.dcache),
        }
    }

    /// Shared L2; `None` in functional mode.
    pub const fn l2cache(&self) -> Option<&Cache> {
        match &self.hierarchy {
            Hierarchy::Functional { .. } => None,
            Hierarchy::Timed { l2, .. } => Some(l2),
        }
    }

    /// DRAM module; `None` in functional mode.
    pub const fn dram(&self) -> Option<&Dram> {
        match &self.hierarchy {
            Hierarchy::Functional { .. } => None,
            Hierarchy::Timed { dram, .. } => Some(dram),
        }
    }

    /// Writes the full report: the memory-system block first, then each
    /// cache of the hierarchy and finally the DRAM block.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `out`.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.stats.write_report(out)?;
        match &self.hierarchy {
            Hierarchy::Functional { dcache } => dcache.stats().write_report(out, "DCACHE"),
            Hierarchy::Timed { cores, l2, dram } => {
                if self.mode == SimMode::MultiCore {
                    for (core, caches) in cores.iter().enumerate() {
                        caches.icache.stats().write_report(out, &format!("ICACHE_{core}"))?;
                        caches.dcache.stats().write_report(out, &format!("DCACHE_{core}"))?;
                    }
                } else {
                    for caches in cores {
                        caches.icache.stats().write_report(out, "ICACHE")?;
                        caches.dcache.stats().write_report(out, "DCACHE")?;
                    }
                }
                l2.stats().write_report(out, "L2CACHE")?;
                dram.stats().write_report(out)
            }
        }
    }

    /// Writes the full report to stdout.
    ///
    /// # Errors
    ///
    /// Propagates write failures of stdout.
    pub fn print_stats(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.write_report(&mut out)?;
        out.flush()
    }
}

/// Demand access through a private L1.
///
/// The L1 latency is charged on every access. A miss fetches the line from
/// L2 (always as a read), installs it, and writes a dirty victim back to L2
/// without charging the writeback.
fn l1_access(
    l1: &mut Cache,
    l2: &mut Cache,
    dram: &mut Dram,
    line_addr: u64,
    is_write: bool,
    core: CoreId,
    now: Cycle,
) -> u64 {
    let mut delay = l1.latency();
    if l1.probe(line_addr, is_write, core, now).is_hit() {
        return delay;
    }

    delay += l2_access(l2, dram, line_addr, false, core, now);

    if let Some(victim) = l1.install(line_addr, is_write, core, now).writeback() {
        debug!(victim, core, "writing back dirty L1 victim to L2");
        let _ = l2_access(l2, dram, victim, true, core, now);
    }
    delay
}

/// Access to the shared L2, either a demand fetch or an L1 writeback.
///
/// A writeback probe counts as a write and marks a resident line dirty. On a
/// miss the line is read from DRAM and installed, dirty iff this was a
/// writeback; a dirty L2 victim is written to DRAM off the critical path.
fn l2_access(l2: &mut Cache, dram: &mut Dram, line_addr: u64, is_writeback: bool, core: CoreId, now: Cycle) -> u64 {
    let mut delay = l2.latency();
    if l2.probe(line_addr, is_writeback, core, now).is_hit() {
        return delay;
    }

    delay += dram.access(line_addr, false);

    if let Some(victim) = l2.install(line_addr, is_writeback, core, now).writeback() {
        debug!(victim, core, "writing back dirty L2 victim to DRAM");
        let _ = dram.access(victim, true);
    }
    delay
}
