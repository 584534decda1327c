//! Memory hierarchy timing model library.
//!
//! This crate models the cache and DRAM hierarchy behind a processor core with the following:
//! 1. **Cache:** Set-associative caches with LRU, random and way-partitioning replacement.
//! 2. **DRAM:** Per-bank row buffers under open- or closed-page policies, or a fixed latency.
//! 3. **Memory System:** L1/L2/DRAM wiring, dirty writebacks, multi-core address translation.
//! 4. **Statistics:** Per-component counters and fixed-format reports.
//! 5. **Traces:** Parsing of text memory-reference traces for replay.

/// Common types and constants (address decoding, access types, errors).
pub mod common;
/// Model configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Set-associative cache engine and replacement policies.
pub mod cache;
/// DRAM engine and timing controllers.
pub mod dram;
/// Memory-system orchestrator and page mapping.
pub mod memsys;
/// Statistics collection and reporting.
pub mod stats;
/// Memory reference trace parsing.
pub mod trace;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Top-level hierarchy; construct with `MemorySystem::new`.
pub use crate::memsys::MemorySystem;
