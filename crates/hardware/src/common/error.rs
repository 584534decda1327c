//! Error definitions.
//!
//! This module defines the error taxonomy of the model:
//! 1. **Configuration Errors:** Invalid geometry or policy parameters, rejected at construction.
//! 2. **Access Errors:** Wiring bugs on the access path (a request for a core that has no caches).
//! 3. **Trace Errors:** Malformed or unclassifiable reference records; callers log and skip them.

use thiserror::Error;

/// Rejected configuration, reported by constructors before any simulation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A size or count that must be non-zero was zero.
    #[error("{what} must be non-zero")]
    ZeroGeometry {
        /// Parameter name.
        what: &'static str,
    },

    /// A size or count that must be a power of two was not.
    #[error("{what} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Parameter name.
        what: &'static str,
        /// Offending value.
        value: u64,
    },

    /// Cache size is not a whole number of sets.
    #[error("cache size {size} is not a multiple of ways ({ways}) x line size ({line})")]
    SizeNotDivisible {
        /// Total size in bytes.
        size: u64,
        /// Associativity.
        ways: usize,
        /// Line size in bytes.
        line: u64,
    },

    /// One set (ways x line size) overflows a 64-bit byte count.
    #[error("set size of {ways} ways x {line}-byte lines overflows 64 bits")]
    SetSizeOverflow {
        /// Associativity.
        ways: usize,
        /// Line size in bytes.
        line: u64,
    },

    /// Associativity above the supported maximum.
    #[error("associativity {ways} exceeds the maximum of {max} ways per set")]
    TooManyWays {
        /// Requested associativity.
        ways: usize,
        /// Supported maximum.
        max: usize,
    },

    /// Row buffer smaller than a cache line.
    #[error("row buffer ({row_buffer} bytes) is smaller than a cache line ({line} bytes)")]
    RowBufferTooSmall {
        /// Row buffer size in bytes.
        row_buffer: u64,
        /// Line size in bytes.
        line: u64,
    },

    /// Static partition quota does not fit in the set.
    #[error("core 0 way quota {quota} exceeds associativity {ways}")]
    QuotaExceedsWays {
        /// Core 0 quota.
        quota: usize,
        /// Associativity of the partitioned cache.
        ways: usize,
    },

    /// Core count not supported by the selected mode.
    #[error("mode {mode} does not support {cores} core(s)")]
    UnsupportedCoreCount {
        /// Selected mode name.
        mode: &'static str,
        /// Requested core count.
        cores: usize,
    },

    /// Configuration text could not be parsed.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure on the access path.
///
/// These indicate a caller/wiring bug rather than a recoverable condition;
/// drivers are expected to abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    /// The requesting core has no private caches in this hierarchy.
    #[error("core {core} is out of range for a {num_cores}-core memory system")]
    CoreOutOfRange {
        /// Requesting core.
        core: usize,
        /// Cores the hierarchy was built for.
        num_cores: usize,
    },
}

/// Text that names no access type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown access kind `{0}`")]
pub struct UnknownAccessKind(pub String);

/// Malformed reference trace input.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Access kind outside {ifetch, load, store}.
    #[error("line {line}: unknown access kind `{kind}`")]
    UnknownAccessKind {
        /// 1-based line number.
        line: usize,
        /// The unrecognised kind field.
        kind: String,
    },

    /// Record could not be parsed.
    #[error("line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// Trace file could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] std::io::Error),
}
