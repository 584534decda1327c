//! Memory Access Types.
//!
//! This module defines the classification of memory references entering the
//! hierarchy. These types are used for the following:
//! 1. **Routing:** Instruction fetches go to the instruction cache, loads and stores to the data cache.
//! 2. **Dirty Tracking:** Stores are the only accesses that mark lines dirty.
//! 3. **Statistics Tracking:** Access count and cumulative delay per access type.

use std::fmt;
use std::str::FromStr;

use super::error::UnknownAccessKind;

/// Identifier of the requesting processor core.
pub type CoreId = usize;

/// Simulation clock value.
///
/// Owned and advanced by the driving simulator; the hierarchy only reads it
/// to timestamp line accesses for LRU.
pub type Cycle = u64;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessType {
    /// Instruction fetch; routed to the instruction cache.
    Ifetch,

    /// Data read; routed to the data cache.
    Load,

    /// Data write; routed to the data cache and marks the line dirty.
    Store,
}

impl AccessType {
    /// Returns true for accesses that modify the line.
    #[inline]
    pub const fn is_write(self) -> bool {
        matches!(self, Self::Store)
    }

    /// Upper-case name used as a statistics label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ifetch => "IFETCH",
            Self::Load => "LOAD",
            Self::Store => "STORE",
        }
    }
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AccessType {
    type Err = UnknownAccessKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "I" | "IFETCH" | "FETCH" => Ok(Self::Ifetch),
            "L" | "R" | "LOAD" => Ok(Self::Load),
            "S" | "W" | "STORE" => Ok(Self::Store),
            _ => Err(UnknownAccessKind(s.to_owned())),
        }
    }
}
