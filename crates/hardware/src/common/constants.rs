//! Global Model Constants.
//!
//! This module defines constants that are part of the modelled machine rather
//! than of a particular configuration. It includes:
//! 1. **Paging:** Page size and the page-number split used by address translation.
//! 2. **Geometry Limits:** Upper bound on cache associativity.

/// Page size in bytes (4KB).
pub const PAGE_SIZE: u64 = 4096;

/// Number of bits to shift to convert between bytes and pages.
pub const PAGE_SHIFT: u32 = 12;

/// Number of low VPN bits carried unchanged into the physical frame number.
pub const PFN_TAIL_BITS: u32 = 20;

/// The maximum number of ways in a cache set.
///
/// Caches configured with a higher associativity are rejected at construction.
pub const MAX_WAYS_PER_CACHE_SET: usize = 16;
