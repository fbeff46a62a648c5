//! Signature and text scanning inside another process's memory
//!
//! ```no_run
//! use remote_sigscan::{ProcessSession, ProcessTarget, ScannerConfig};
//!
//! let target: ProcessTarget = "Growtopia".parse()?;
//! let session = ProcessSession::open(&target, ScannerConfig::default())?;
//! for address in session.find_pattern("?? 66 ?? F7 ?? ??")? {
//!     println!("{:x}", address);
//! }
//! # Ok::<(), remote_sigscan::MemoryError>(())
//! ```

pub mod config;
pub mod core;
pub mod memory;
pub mod process;

pub use crate::config::{Config, ScannerConfig};
pub use crate::core::types::{
    Address, MemoryError, MemoryRange, MemoryResult, ModuleBounds, ProcessId,
};
pub use crate::memory::{
    CancelToken, Pattern, RemoteMemory, ScanReport, Scanner, SnapshotReader, Token,
};
pub use crate::process::{
    enumerate_processes, find_processes_by_name, ProcessHandle, ProcessInfo, ProcessSession,
    ProcessTarget,
};
