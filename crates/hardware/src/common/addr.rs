//! Line Address Decoding.
//!
//! All transactions inside the hierarchy happen at cache-line granularity, so
//! the decoders here operate on *line addresses* (byte address divided by the
//! line size). It provides the following:
//! 1. **Cache Decoding:** `{set index, tag}` from the low and high bits of a line address.
//! 2. **DRAM Decoding:** `{bank, row}` after dropping the column bits of a line address.
//! 3. **Geometry Checks:** Exact base-2 logarithms that reject non-power-of-two sizes.
//!
//! Both decoders are lossless: recombining the fields yields the input.

use super::error::ConfigError;

/// Set index and tag of a line address within one cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheIndex {
    /// Set the line maps to (`line_addr mod 2^index_bits`).
    pub set: usize,
    /// Remaining high bits (`line_addr >> index_bits`).
    pub tag: u64,
}

impl CacheIndex {
    /// Rebuilds the line address this index was decoded from.
    ///
    /// Used to recover the pre-eviction address of a victim from its stored
    /// tag and the set it lived in.
    #[inline]
    pub fn line_addr(&self, index_bits: u32) -> u64 {
        (self.tag << index_bits) | self.set as u64
    }
}

/// Bank and row of a line address within the DRAM module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DramIndex {
    /// Row within the bank.
    pub row: u64,
    /// Bank the row lives in.
    pub bank: usize,
}

impl DramIndex {
    /// Rebuilds the row-granular address (`row << bank_bits | bank`).
    #[inline]
    pub fn row_addr(&self, bank_bits: u32) -> u64 {
        (self.row << bank_bits) | self.bank as u64
    }
}

#[inline]
fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Splits a line address into `{set, tag}` for a cache with `2^index_bits` sets.
///
/// # Arguments
///
/// * `index_bits` - `log2(num_sets)` of the target cache.
/// * `line_addr` - Address in units of the cache line size.
#[inline]
pub fn decode_cache_address(index_bits: u32, line_addr: u64) -> CacheIndex {
    CacheIndex {
        set: (line_addr & low_mask(index_bits)) as usize,
        tag: line_addr.checked_shr(index_bits).unwrap_or(0),
    }
}

/// Splits a line address into `{row, bank}` for a DRAM module.
///
/// The line address is first shifted right by `column_shift`
/// (`log2(row_buffer_bytes / line_bytes)`) so that all lines sharing a row
/// buffer decode to the same row; the low `bank_bits` of the result select
/// the bank and the rest form the row id.
#[inline]
pub fn decode_dram_address(bank_bits: u32, column_shift: u32, line_addr: u64) -> DramIndex {
    let row_addr = line_addr.checked_shr(column_shift).unwrap_or(0);
    DramIndex {
        row: row_addr.checked_shr(bank_bits).unwrap_or(0),
        bank: (row_addr & low_mask(bank_bits)) as usize,
    }
}

/// Returns `log2(value)` when `value` is a non-zero power of two.
///
/// # Errors
///
/// `ConfigError::ZeroGeometry` for zero and `ConfigError::NotPowerOfTwo`
/// otherwise; `what` names the offending parameter in the message.
pub fn log2_exact(value: u64, what: &'static str) -> Result<u32, ConfigError> {
    if value == 0 {
        return Err(ConfigError::ZeroGeometry { what });
    }
    if !value.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { what, value });
    }
    Ok(value.trailing_zeros())
}
