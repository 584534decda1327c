//! DRAM Engine.
//!
//! This module implements the main memory module at the bottom of the
//! hierarchy. It provides:
//! 1. **Controller:** Latency modeling (fixed or row-buffer) for timing simulation.
//! 2. **Statistics:** Read/write access counts and cumulative delays.
//!
//! Addresses are line addresses; the DRAM never sees byte offsets.

/// DRAM timing controllers.
pub mod controller;

use tracing::debug;

use self::controller::{FixedLatencyController, MemoryController, RowBufferController, RowBufferState};
use crate::common::error::ConfigError;
use crate::config::DramConfig;

/// Running statistics of the DRAM module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DramStats {
    /// Read accesses (line fills).
    pub read_access: u64,
    /// Write accesses (writebacks).
    pub write_access: u64,
    /// Sum of read delays in cycles.
    pub read_delay: u64,
    /// Sum of write delays in cycles.
    pub write_delay: u64,
}

impl DramStats {
    /// Mean read delay, 0 when there were no reads.
    pub fn read_delay_avg(&self) -> f64 {
        average(self.read_delay, self.read_access)
    }

    /// Mean write delay, 0 when there were no writes.
    pub fn write_delay_avg(&self) -> f64 {
        average(self.write_delay, self.write_access)
    }
}

fn average(total: u64, count: u64) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / count as f64
    }
}

/// DRAM module.
#[derive(Debug)]
pub struct Dram {
    controller: Box<dyn MemoryController>,
    stats: DramStats,
}

impl Dram {
    /// Creates the DRAM module for a configuration.
    ///
    /// With `fixed` set every access costs `config.fixed_latency` and the
    /// bank geometry is not used; otherwise the row-buffer model is built.
    ///
    /// # Errors
    ///
    /// As [`RowBufferController::new`] when `fixed` is false.
    pub fn new(config: &DramConfig, line_bytes: u64, fixed: bool) -> Result<Self, ConfigError> {
        let controller: Box<dyn MemoryController> = if fixed {
            Box::new(FixedLatencyController::new(config.fixed_latency))
        } else {
            Box::new(RowBufferController::new(config, line_bytes)?)
        };
        debug!(fixed, banks = config.banks, page_policy = ?config.page_policy, "dram constructed");
        Ok(Self::with_controller(controller))
    }

    /// Wraps an arbitrary timing controller.
    pub fn with_controller(controller: Box<dyn MemoryController>) -> Self {
        Self {
            controller,
            stats: DramStats::default(),
        }
    }

    /// Accesses the line, returning the delay in cycles.
    ///
    /// The delay is added to the read or write totals regardless of the
    /// timing model.
    pub fn access(&mut self, line_addr: u64, is_write: bool) -> u64 {
        let delay = self.controller.access_latency(line_addr);
        if is_write {
            self.stats.write_access += 1;
            self.stats.write_delay += delay;
        } else {
            self.stats.read_access += 1;
            self.stats.read_delay += delay;
        }
        delay
    }

    /// Row buffer state of `bank`; `None` for fixed-latency DRAM or an unknown bank.
    pub fn row_buffer_state(&self, bank: usize) -> Option<RowBufferState> {
        self.controller.row_buffer(bank)
    }

    /// Access statistics.
    pub const fn stats(&self) -> &DramStats {
        &self.stats
    }
}
