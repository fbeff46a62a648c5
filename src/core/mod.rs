//! Core module containing fundamental types shared by the scanner and
//! the process layer.

pub mod types;

pub use types::{Address, MemoryError, MemoryRange, MemoryResult, ModuleBounds, ProcessId};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(not(any(windows, target_os = "linux")))]
compile_error!("remote-sigscan supports Windows and Linux targets only");
