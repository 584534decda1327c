//! DRAM timing controllers.
//!
//! This module provides:
//! 1. **FixedLatencyController:** One constant delay per access, no bank state.
//! 2. **RowBufferController:** Per-bank row-buffer state machine under an open- or closed-page policy.

use tracing::trace;

use crate::common::addr::{DramIndex, decode_dram_address, log2_exact};
use crate::common::error::ConfigError;
use crate::config::{DramConfig, PagePolicy};

/// Trait for DRAM timing models that report access latency in cycles.
pub trait MemoryController: std::fmt::Debug + Send + Sync {
    /// Returns the number of cycles taken by an access to `line_addr`,
    /// updating any internal bank state.
    fn access_latency(&mut self, line_addr: u64) -> u64;

    /// Current state of a bank's row buffer, for models that track one.
    fn row_buffer(&self, _bank: usize) -> Option<RowBufferState> {
        None
    }
}

/// Fixed-latency controller; every access takes the same number of cycles.
#[derive(Debug, Clone, Copy)]
pub struct FixedLatencyController {
    latency: u64,
}

impl FixedLatencyController {
    /// Creates a controller charging `latency` cycles per access.
    pub const fn new(latency: u64) -> Self {
        Self { latency }
    }
}

impl MemoryController for FixedLatencyController {
    fn access_latency(&mut self, _line_addr: u64) -> u64 {
        self.latency
    }
}

/// DRAM command latencies in cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DramTiming {
    /// Row activation.
    pub t_act: u64,
    /// Column access.
    pub t_cas: u64,
    /// Precharge (closing the open row).
    pub t_pre: u64,
    /// Data transfer over the bus.
    pub t_bus: u64,
}

impl DramTiming {
    /// Cost of opening a row in an idle bank and reading it.
    pub const fn row_empty(&self) -> u64 {
        self.t_act + self.t_cas + self.t_bus
    }

    /// Cost of reading the already open row.
    pub const fn row_hit(&self) -> u64 {
        self.t_cas + self.t_bus
    }

    /// Cost of closing another row, opening this one and reading it.
    pub const fn row_conflict(&self) -> u64 {
        self.t_pre + self.t_act + self.t_cas + self.t_bus
    }
}

impl From<&DramConfig> for DramTiming {
    fn from(config: &DramConfig) -> Self {
        Self {
            t_act: config.t_act,
            t_cas: config.t_cas,
            t_pre: config.t_pre,
            t_bus: config.t_bus,
        }
    }
}

/// State of one bank's row buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowBufferState {
    /// No row latched.
    #[default]
    Closed,
    /// The given row is latched.
    Open(u64),
}

/// Row-buffer-aware controller.
#[derive(Debug, Clone)]
pub struct RowBufferController {
    banks: Vec<RowBufferState>,
    bank_bits: u32,
    column_shift: u32,
    timing: DramTiming,
    policy: PagePolicy,
}

impl RowBufferController {
    /// Creates a controller with every bank closed.
    ///
    /// # Errors
    ///
    /// `ConfigError` if the bank count, row buffer size or line size is not
    /// a non-zero power of two, or the row buffer is smaller than a line.
    pub fn new(config: &DramConfig, line_bytes: u64) -> Result<Self, ConfigError> {
        let bank_bits = log2_exact(config.banks, "DRAM bank count")?;
        let row_bits = log2_exact(config.row_buffer_bytes, "row buffer size")?;
        let line_bits = log2_exact(line_bytes, "cache line size")?;
        if row_bits < line_bits {
            return Err(ConfigError::RowBufferTooSmall {
                row_buffer: config.row_buffer_bytes,
                line: line_bytes,
            });
        }

        Ok(Self {
            banks: vec![RowBufferState::Closed; config.banks as usize],
            bank_bits,
            column_shift: row_bits - line_bits,
            timing: DramTiming::from(config),
            policy: config.page_policy,
        })
    }

    /// Splits a line address into `{row, bank}`.
    #[inline]
    pub fn decode(&self, line_addr: u64) -> DramIndex {
        decode_dram_address(self.bank_bits, self.column_shift, line_addr)
    }

    /// `log2(banks)`.
    pub const fn bank_bits(&self) -> u32 {
        self.bank_bits
    }

    /// Bits of the row-granular address left for the row id.
    pub const fn tag_bits(&self) -> u32 {
        u64::BITS - self.bank_bits
    }

    /// `log2(row_buffer_bytes / line_bytes)`.
    pub const fn column_shift(&self) -> u32 {
        self.column_shift
    }
}

impl MemoryController for RowBufferController {
    fn access_latency(&mut self, line_addr: u64) -> u64 {
        if self.policy == PagePolicy::ClosePage {
            return self.timing.row_empty();
        }

        let DramIndex { row, bank } = self.decode(line_addr);
        let state = &mut self.banks[bank];
        let (delay, outcome) = match *state {
            RowBufferState::Closed => (self.timing.row_empty(), "empty"),
            RowBufferState::Open(open) if open == row => (self.timing.row_hit(), "hit"),
            RowBufferState::Open(_) => (self.timing.row_conflict(), "conflict"),
        };
        *state = RowBufferState::Open(row);
        trace!(line_addr, bank, row, outcome, delay, "row buffer access");
        delay
    }

    fn row_buffer(&self, bank: usize) -> Option<RowBufferState> {
        self.banks.get(bank).copied()
    }
}
