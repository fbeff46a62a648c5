//! Core type definitions
//!
//! Address wrappers, scan ranges, module bounds and the crate error type.

mod address;
mod error;
mod range;

pub use address::Address;
pub use error::{MemoryError, MemoryResult};
pub use range::{MemoryRange, ModuleBounds};

pub type ProcessId = u32;
