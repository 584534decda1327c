//! Common utilities and types used throughout the memory hierarchy model.
//!
//! This module provides the building blocks shared by the cache engine, the
//! DRAM engine and the memory-system orchestrator. It includes:
//! 1. **Address Decoding:** Splitting line addresses into set/tag and bank/row fields.
//! 2. **Constants:** Page size, way limits and fixed latencies.
//! 3. **Access Classification:** Instruction fetch / load / store and core identifiers.
//! 4. **Error Handling:** Configuration, access and trace errors.

/// Address decoding for caches and DRAM.
pub mod addr;

/// Common constants used throughout the model.
pub mod constants;

/// Memory access classification.
pub mod data;

/// Error types.
pub mod error;

pub use addr::{CacheIndex, DramIndex, decode_cache_address, decode_dram_address, log2_exact};
pub use constants::{MAX_WAYS_PER_CACHE_SET, PAGE_SHIFT, PAGE_SIZE};
pub use data::{AccessType, CoreId, Cycle};
pub use error::{AccessError, ConfigError, TraceError, UnknownAccessKind};
