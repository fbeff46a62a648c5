//! Process attachment
//!
//! Lists running processes, resolves one by name or PID, opens it for
//! reading and locates the bounds of its main module. The platform backend is
//! chosen at compile time.

pub mod handle;
pub mod info;
pub mod session;
pub mod target;

#[cfg(target_os = "linux")]
mod linux;
#[cfg(windows)]
mod windows;

#[cfg(target_os = "linux")]
use linux as platform;
#[cfg(windows)]
use windows as platform;

pub use handle::ProcessHandle;
pub use info::{enumerate_processes, find_processes_by_name, ProcessInfo};
pub use session::ProcessSession;
pub use target::ProcessTarget;
