//! Running process listing

use crate::core::types::{MemoryResult, ProcessId};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A running process as seen at enumeration time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessInfo {
    pub pid: ProcessId,
    /// Executable name (`Game.exe`) on Windows, the kernel command name on Linux
    pub name: String,
    /// Full executable path, when the process exposes it
    pub path: Option<PathBuf>,
}

impl ProcessInfo {
    /// Whether `name` refers to this process (case-insensitive).
    ///
    /// On Windows a trailing `.exe` is optional on either side. On Linux a
    /// truncated command name matches by prefix, and the executable file name
    /// is accepted too.
    pub fn matches_name(&self, name: &str) -> bool {
        super::platform::name_matches(self, name)
    }
}

impl fmt::Display for ProcessInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (PID: {})", self.name, self.pid)
    }
}

/// Lists every running process visible to the caller, ordered by PID
pub fn enumerate_processes() -> MemoryResult<Vec<ProcessInfo>> {
    let mut processes = super::platform::enumerate_processes()?;
    processes.sort_unstable_by_key(|process| process.pid);
    Ok(processes)
}

/// Every visible process matching `name`, ordered by PID
pub fn find_processes_by_name(name: &str) -> MemoryResult<Vec<ProcessInfo>> {
    Ok(enumerate_processes()?
        .into_iter()
        .filter(|process| process.matches_name(name))
        .collect())
}
