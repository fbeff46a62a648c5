//! Memory scanning for remote processes
//!
//! This module provides:
//! - Pattern compilation for hex/wildcard signatures and literal text
//! - The `RemoteMemory` read capability and an in-memory snapshot source
//! - The chunked, parallel scan engine
//! - Scoped scratch buffers and match collection

pub mod buffer;
pub mod collector;
pub mod pattern;
pub mod remote;
pub mod scanner;

pub use buffer::ScratchBuffer;
pub use collector::MatchCollector;
pub use pattern::{Pattern, Token, WILDCARD};
pub use remote::{RemoteMemory, SnapshotReader};
pub use scanner::{worker_pool, CancelToken, ScanReport, Scanner};
