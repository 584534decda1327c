//! Statistics collection and reporting.
//!
//! This module tracks the memory-system counters and renders every
//! component's report. It provides:
//! 1. **Memory-system counters:** Access count and cumulative delay per access type.
//! 2. **Report rendering:** Fixed-format, label-prefixed blocks for caches, DRAM and the memory system.
//!
//! Each block starts with an empty line and prints one `NAME \t\t : value`
//! row per counter: integers right-aligned in 10 columns, ratios and averages
//! with three decimals. Derived values are 0 when their denominator is 0.

use std::io::{self, Write};

use crate::cache::CacheStats;
use crate::common::data::AccessType;
use crate::dram::DramStats;

/// Access count and cumulative delay of one access type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessCounters {
    /// References seen.
    pub access: u64,
    /// Sum of returned delays in cycles.
    pub delay: u64,
}

impl AccessCounters {
    /// Mean delay per reference, 0 when there were none.
    pub fn avg_delay(&self) -> f64 {
        if self.access == 0 {
            0.0
        } else {
            self.delay as f64 / self.access as f64
        }
    }
}

/// Memory-system statistics, split by access type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemsysStats {
    /// Instruction fetches.
    pub ifetch: AccessCounters,
    /// Data loads.
    pub load: AccessCounters,
    /// Data stores.
    pub store: AccessCounters,
}

impl MemsysStats {
    /// Counts one reference of `kind` that took `delay` cycles.
    pub fn record(&mut self, kind: AccessType, delay: u64) {
        let counters = self.counters_mut(kind);
        counters.access += 1;
        counters.delay += delay;
    }

    fn counters_mut(&mut self, kind: AccessType) -> &mut AccessCounters {
        match kind {
            AccessType::Ifetch => &mut self.ifetch,
            AccessType::Load => &mut self.load,
            AccessType::Store => &mut self.store,
        }
    }

    /// Writes the `MEMSYS_*` block.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `out`.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "MEMSYS_IFETCH_ACCESS   \t\t : {:10}", self.ifetch.access)?;
        writeln!(out, "MEMSYS_LOAD_ACCESS     \t\t : {:10}", self.load.access)?;
        writeln!(out, "MEMSYS_STORE_ACCESS    \t\t : {:10}", self.store.access)?;
        writeln!(out, "MEMSYS_IFETCH_AVGDELAY \t\t : {:10.3}", self.ifetch.avg_delay())?;
        writeln!(out, "MEMSYS_LOAD_AVGDELAY   \t\t : {:10.3}", self.load.avg_delay())?;
        writeln!(out, "MEMSYS_STORE_AVGDELAY  \t\t : {:10.3}", self.store.avg_delay())?;
        Ok(())
    }
}

impl CacheStats {
    /// Writes the block of one cache, every row prefixed with `label`
    /// (for example `DCACHE` or `ICACHE_1`).
    ///
    /// # Errors
    ///
    /// Propagates write failures of `out`.
    pub fn write_report<W: Write>(&self, out: &mut W, label: &str) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{label}_READ_ACCESS     \t\t : {:10}", self.read_access)?;
        writeln!(out, "{label}_WRITE_ACCESS    \t\t : {:10}", self.write_access)?;
        writeln!(out, "{label}_READ_MISS       \t\t : {:10}", self.read_miss)?;
        writeln!(out, "{label}_WRITE_MISS      \t\t : {:10}", self.write_miss)?;
        writeln!(out, "{label}_READ_MISS_PERC  \t\t : {:10.3}", self.read_miss_percent())?;
        writeln!(out, "{label}_WRITE_MISS_PERC \t\t : {:10.3}", self.write_miss_percent())?;
        writeln!(out, "{label}_DIRTY_EVICTS    \t\t : {:10}", self.dirty_evicts)?;
        Ok(())
    }
}

impl DramStats {
    /// Writes the `DRAM_*` block.
    ///
    /// # Errors
    ///
    /// Propagates write failures of `out`.
    pub fn write_report<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "DRAM_READ_ACCESS     \t\t : {:10}", self.read_access)?;
        writeln!(out, "DRAM_WRITE_ACCESS    \t\t : {:10}", self.write_access)?;
        writeln!(out, "DRAM_READ_DELAY_AVG  \t\t : {:10.3}", self.read_delay_avg())?;
        writeln!(out, "DRAM_WRITE_DELAY_AVG \t\t : {:10.3}", self.write_delay_avg())?;
        Ok(())
    }
}
