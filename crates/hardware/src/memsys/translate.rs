//! Per-Core Page Mapping.
//!
//! Multi-core runs replay independent address streams that all start from the
//! same virtual layout. Each core's pages are mapped into a disjoint range of
//! physical frames so that equal virtual addresses issued by different cores
//! never alias in the shared L2 or DRAM.
//!
//! A virtual page number is split at bit 20: the low 20 bits (`tail`) are kept
//! in place, `ceil(log2(num_cores))` bits of core id are inserted above them and
//! the remaining high bits (`head`) are shifted above the core id:
//!
//! ```text
//! pfn = head << (20 + core_bits) | core << 20 | tail
//! ```
//!
//! The mapping is injective for virtual addresses below `2^(64 - core_bits)`.
//! The top `core_bits` bits of a wider address are shifted out, so such an
//! address shares its frame with the one that has those bits cleared.

use crate::common::constants::{PAGE_SHIFT, PFN_TAIL_BITS};
use crate::common::data::CoreId;

/// Static VPN-to-PFN mapping for a fixed number of cores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageMapper {
    core_bits: u32,
}

impl PageMapper {
    /// Creates a mapper for `num_cores` cores (at least one).
    pub const fn new(num_cores: usize) -> Self {
        let core_bits = if num_cores <= 1 {
            0
        } else {
            usize::BITS - (num_cores - 1).leading_zeros()
        };
        Self { core_bits }
    }

    /// Number of core-id bits inserted into each frame number.
    pub const fn core_bits(&self) -> u32 {
        self.core_bits
    }

    /// Maps a virtual page number of `core` to its physical frame number.
    pub const fn vpn_to_pfn(&self, vpn: u64, core: CoreId) -> u64 {
        let tail = vpn & ((1 << PFN_TAIL_BITS) - 1);
        let head = vpn >> PFN_TAIL_BITS;
        (head << (PFN_TAIL_BITS + self.core_bits)) | ((core as u64) << PFN_TAIL_BITS) | tail
    }

    /// Translates a virtual byte address of `core` to a physical byte address.
    ///
    /// The page offset is carried over unchanged.
    pub const fn translate(&self, vaddr: u64, core: CoreId) -> u64 {
        let offset = vaddr & ((1 << PAGE_SHIFT) - 1);
        let pfn = self.vpn_to_pfn(vaddr >> PAGE_SHIFT, core);
        (pfn << PAGE_SHIFT) | offset
    }

    /// Translates a virtual line address (in units of `line_bits`-sized lines).
    pub const fn translate_line(&self, v_line_addr: u64, core: CoreId, line_bits: u32) -> u64 {
        self.translate(v_line_addr << line_bits, core) >> line_bits
    }
}
