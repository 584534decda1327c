//! Set-Associative Cache Engine.
//!
//! This module implements one cache of the hierarchy. It models tags,
//! validity, dirtiness and line ownership (no data values) and provides:
//! 1. **Probe:** Hit/miss lookup that updates LRU timestamps, dirty bits and statistics.
//! 2. **Install:** Victim selection and line fill, reporting the evicted line to the caller.
//! 3. **Victim Selection:** Empty ways first, then the configured replacement policy.
//!
//! Lines are matched on both tag and owning core, so lines brought in by
//! different cores never hit for each other.

/// Cache replacement policy implementations (LRU, Random, SWP, DWP).
pub mod policies;

use tracing::{debug, trace};

use self::policies::{PolicyParams, ReplacementPolicy};
use crate::common::addr::{CacheIndex, decode_cache_address, log2_exact};
use crate::common::constants::MAX_WAYS_PER_CACHE_SET;
use crate::common::data::{CoreId, Cycle};
use crate::common::error::ConfigError;
use crate::config::{CacheConfig, ReplacementPolicy as PolicyKind};

/// Cache line entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheLine {
    /// Line holds a block.
    pub valid: bool,
    /// Line was written since it was installed.
    pub dirty: bool,
    /// High bits of the line address.
    pub tag: u64,
    /// Core that installed the line.
    pub owner: CoreId,
    /// Cycle of the install or the latest hit.
    pub last_access: Cycle,
    /// Hits since install.
    pub hits: u64,
}

/// One set: `ways` lines plus a miss counter.
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: Vec<CacheLine>,
    misses: u64,
}

impl CacheSet {
    fn new(ways: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); ways],
            misses: 0,
        }
    }

    /// Lines of the set in way order.
    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Associativity.
    pub fn ways(&self) -> usize {
        self.lines.len()
    }

    /// Misses recorded against this set.
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Number of valid lines.
    pub fn valid_count(&self) -> usize {
        self.lines.iter().filter(|l| l.valid).count()
    }

    /// Way holding `tag` for `core`, if any.
    pub fn find(&self, tag: u64, core: CoreId) -> Option<usize> {
        self.lines
            .iter()
            .position(|l| l.valid && l.tag == tag && l.owner == core)
    }

    fn first_invalid(&self) -> Option<usize> {
        self.lines.iter().position(|l| !l.valid)
    }
}

/// Outcome of a probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheResult {
    /// The line was resident.
    Hit,
    /// The line was not resident.
    Miss,
}

impl CacheResult {
    /// Returns true for `Hit`.
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// A valid line displaced by an install.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvictedLine {
    /// Line address the victim held before eviction.
    pub line_addr: u64,
    /// Victim was dirty and must be written to the next level.
    pub dirty: bool,
    /// Core that owned the victim.
    pub owner: CoreId,
}

/// Result of [`Cache::install`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstallOutcome {
    /// Way the new line was written to.
    pub way: usize,
    /// Valid line that was overwritten, if the way was occupied.
    pub evicted: Option<EvictedLine>,
}

impl InstallOutcome {
    /// Line address owed to the next level, when the victim was valid and dirty.
    pub fn writeback(&self) -> Option<u64> {
        self.evicted.filter(|e| e.dirty).map(|e| e.line_addr)
    }
}

/// Running access statistics of one cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Read probes.
    pub read_access: u64,
    /// Write probes.
    pub write_access: u64,
    /// Read probes that missed.
    pub read_miss: u64,
    /// Write probes that missed.
    pub write_miss: u64,
    /// Installs that displaced a valid dirty line.
    pub dirty_evicts: u64,
}

impl CacheStats {
    /// Read miss ratio in percent, 0 when there were no reads.
    pub fn read_miss_percent(&self) -> f64 {
        percent(self.read_miss, self.read_access)
    }

    /// Write miss ratio in percent, 0 when there were no writes.
    pub fn write_miss_percent(&self) -> f64 {
        percent(self.write_miss, self.write_access)
    }
}

fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        100.0 * part as f64 / whole as f64
    }
}

/// A set-associative cache.
#[derive(Debug)]
pub struct Cache {
    sets: Vec<CacheSet>,
    num_ways: usize,
    index_bits: u32,
    latency: u64,
    policy: Box<dyn ReplacementPolicy>,
    stats: CacheStats,
}

impl Cache {
    /// Creates an empty cache.
    ///
    /// # Arguments
    ///
    /// * `size_bytes` - Total capacity in bytes.
    /// * `ways` - Associativity, at most [`MAX_WAYS_PER_CACHE_SET`].
    /// * `line_bytes` - Line size in bytes.
    /// * `policy` - Victim selection once a set is full.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the geometry is zero, the associativity
    /// exceeds the maximum, one set does not fit in 64 bits, the size is not
    /// a whole number of sets, or the line size or set count is not a power of two.
    pub fn new(
        size_bytes: u64,
        ways: usize,
        line_bytes: u64,
        policy: Box<dyn ReplacementPolicy>,
    ) -> Result<Self, ConfigError> {
        if ways == 0 {
            return Err(ConfigError::ZeroGeometry { what: "associativity" });
        }
        if ways > MAX_WAYS_PER_CACHE_SET {
            return Err(ConfigError::TooManyWays {
                ways,
                max: MAX_WAYS_PER_CACHE_SET,
            });
        }
        let _ = log2_exact(line_bytes, "cache line size")?;
        let set_bytes = (ways as u64)
            .checked_mul(line_bytes)
            .ok_or(ConfigError::SetSizeOverflow { ways, line: line_bytes })?;
        if size_bytes % set_bytes != 0 {
            return Err(ConfigError::SizeNotDivisible {
                size: size_bytes,
                ways,
                line: line_bytes,
            });
        }
        let num_sets = size_bytes / set_bytes;
        let index_bits = log2_exact(num_sets, "cache set count")?;

        debug!(
            size_bytes,
            ways,
            num_sets,
            index_bits,
            policy = policy.name(),
            "cache constructed"
        );

        Ok(Self {
            sets: (0..num_sets).map(|_| CacheSet::new(ways)).collect(),
            num_ways: ways,
            index_bits,
            latency: 0,
            policy,
            stats: CacheStats::default(),
        })
    }

    /// Creates a cache level from its configuration.
    ///
    /// # Errors
    ///
    /// As [`Cache::new`].
    pub fn from_config(
        config: &CacheConfig,
        line_bytes: u64,
        kind: PolicyKind,
        params: PolicyParams,
    ) -> Result<Self, ConfigError> {
        let policy = policies::build(kind, params);
        Ok(Self::new(config.size_bytes, config.ways, line_bytes, policy)?.with_latency(config.latency))
    }

    /// Sets the hit latency charged by the orchestrator.
    #[must_use]
    pub const fn with_latency(mut self, latency: u64) -> Self {
        self.latency = latency;
        self
    }

    /// Splits a line address into `{set, tag}` for this cache.
    #[inline]
    pub fn decode(&self, line_addr: u64) -> CacheIndex {
        decode_cache_address(self.index_bits, line_addr)
    }

    /// Looks up a line, updating state and statistics.
    ///
    /// On a hit the line's timestamp becomes `now`, its hit counter is
    /// incremented and a write marks it dirty. Access counters are updated
    /// on every probe; miss counters (cache and set) only on a miss.
    pub fn probe(&mut self, line_addr: u64, is_write: bool, core: CoreId, now: Cycle) -> CacheResult {
        let CacheIndex { set, tag } = self.decode(line_addr);
        let cache_set = &mut self.sets[set];

        if is_write {
            self.stats.write_access += 1;
        } else {
            self.stats.read_access += 1;
        }

        if let Some(way) = cache_set.find(tag, core) {
            let line = &mut cache_set.lines[way];
            line.last_access = now;
            line.dirty |= is_write;
            line.hits += 1;
            trace!(line_addr, set, way, core, "cache hit");
            return CacheResult::Hit;
        }

        if is_write {
            self.stats.write_miss += 1;
        } else {
            self.stats.read_miss += 1;
        }
        cache_set.misses += 1;
        trace!(line_addr, set, core, "cache miss");
        CacheResult::Miss
    }

    /// Installs a line, evicting a victim chosen by [`Cache::find_victim`].
    ///
    /// The new line is valid, dirty iff `is_write`, owned by `core`,
    /// timestamped `now` and has no hits. The displaced line, if valid, is
    /// returned with its reconstructed address so the caller can write it
    /// back; a dirty victim also bumps the dirty-eviction counter.
    pub fn install(&mut self, line_addr: u64, is_write: bool, core: CoreId, now: Cycle) -> InstallOutcome {
        let CacheIndex { set, tag } = self.decode(line_addr);
        debug_assert!(
            self.sets[set].find(tag, core).is_none(),
            "line {line_addr:#x} already resident for core {core}"
        );

        let way = self.find_victim(set, core);
        let slot = &mut self.sets[set].lines[way];
        let victim = *slot;
        *slot = CacheLine {
            valid: true,
            dirty: is_write,
            tag,
            owner: core,
            last_access: now,
            hits: 0,
        };

        let evicted = victim.valid.then(|| EvictedLine {
            line_addr: CacheIndex { set, tag: victim.tag }.line_addr(self.index_bits),
            dirty: victim.dirty,
            owner: victim.owner,
        });
        if let Some(ev) = evicted.filter(|e| e.dirty) {
            self.stats.dirty_evicts += 1;
            debug!(victim = ev.line_addr, set, way, owner = ev.owner, "dirty eviction");
        }

        InstallOutcome { way, evicted }
    }

    /// Chooses the way to fill in `set` for a request from `core`.
    ///
    /// Any invalid way is returned first (lowest index); only a full set is
    /// handed to the replacement policy.
    pub fn find_victim(&mut self, set: usize, core: CoreId) -> usize {
        let cache_set = &self.sets[set];
        match cache_set.first_invalid() {
            Some(way) => way,
            None => self.policy.victim(cache_set, core).min(self.num_ways - 1),
        }
    }

    /// Returns true if `core` holds the line, without touching any state.
    pub fn contains(&self, line_addr: u64, core: CoreId) -> bool {
        let CacheIndex { set, tag } = self.decode(line_addr);
        self.sets[set].find(tag, core).is_some()
    }

    /// All sets in index order.
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Associativity.
    pub const fn num_ways(&self) -> usize {
        self.num_ways
    }

    /// `log2(num_sets)`.
    pub const fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Bits of a 64-bit line address left for the tag.
    pub const fn tag_bits(&self) -> u32 {
        u64::BITS - self.index_bits
    }

    /// Hit latency in cycles.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Name of the replacement policy.
    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }

    /// Access statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
