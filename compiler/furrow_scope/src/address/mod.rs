//! Packed variable addresses.

use std::fmt;

/// A resolved variable reference: `depth` hops outward, then `slot`.
///
/// Layout: 32 bits, `depth` in bits 31-16 and `slot` in bits 15-0.
/// Depth 0 means the variable lives in the scope the query started from.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VarAddress(u32);

impl VarAddress {
    /// Largest encodable depth or slot.
    pub const MAX_FIELD: u16 = u16::MAX;

    /// Pack a depth and slot.
    #[inline]
    pub const fn new(depth: u16, slot: u16) -> Self {
        VarAddress(((depth as u32) << 16) | slot as u32)
    }

    /// Reinterpret a raw packed value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        VarAddress(raw)
    }

    /// Number of enclosing-scope hops.
    #[inline]
    pub const fn depth(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Index within the scope that owns the variable.
    #[inline]
    pub const fn slot(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// The packed integer.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Whether the variable lives in the querying scope itself.
    #[inline]
    pub const fn is_local(self) -> bool {
        self.depth() == 0
    }
}

impl fmt::Debug for VarAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarAddress(depth={}, slot={})", self.depth(), self.slot())
    }
}

impl fmt::Display for VarAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.depth(), self.slot())
    }
}
