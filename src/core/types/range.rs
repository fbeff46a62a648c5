//! Address ranges and module bounds

use super::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A contiguous `[start, end)` span of the target's address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRange {
    pub start: Address,
    pub end: Address,
}

impl MemoryRange {
    /// Creates a range; orientation is checked by the scanner, not here
    pub const fn new(start: Address, end: Address) -> Self {
        MemoryRange { start, end }
    }

    /// Creates a range covering `len` bytes from `start`
    pub const fn with_len(start: Address, len: usize) -> Self {
        MemoryRange {
            start,
            end: start.saturating_add(len),
        }
    }

    /// Whether `start > end`
    pub const fn is_inverted(&self) -> bool {
        self.start.0 > self.end.0
    }

    /// Number of bytes covered, zero for inverted ranges
    pub const fn len(&self) -> usize {
        self.end.0.saturating_sub(self.start.0)
    }

    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `address` lies within the range
    pub const fn contains(&self, address: Address) -> bool {
        address.0 >= self.start.0 && address.0 < self.end.0
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Base and end address of a loaded executable image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleBounds {
    pub name: String,
    pub base: Address,
    pub end: Address,
}

impl ModuleBounds {
    pub fn new(name: impl Into<String>, base: Address, end: Address) -> Self {
        ModuleBounds {
            name: name.into(),
            base,
            end,
        }
    }

    /// Image size in bytes
    pub fn size(&self) -> usize {
        self.end.offset_from(self.base)
    }

    /// The default scan range for this module
    pub fn range(&self) -> MemoryRange {
        MemoryRange::new(self.base, self.end)
    }
}
