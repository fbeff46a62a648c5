//! Process selection by name or PID

use crate::core::types::{MemoryError, MemoryResult, ProcessId};
use std::fmt;
use std::str::FromStr;

/// Which process a session attaches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessTarget {
    Name(String),
    Pid(ProcessId),
}

impl ProcessTarget {
    /// Resolves the target to a PID
    pub fn resolve(&self) -> MemoryResult<ProcessId> {
        match self {
            ProcessTarget::Pid(pid) => Ok(*pid),
            // Lowest PID wins when several processes share the name
            ProcessTarget::Name(name) => super::find_processes_by_name(name)?
                .first()
                .map(|process| process.pid)
                .ok_or_else(|| MemoryError::ProcessNotFound(name.clone())),
        }
    }
}

impl FromStr for ProcessTarget {
    type Err = MemoryError;

    /// All-digit input is a PID, anything else a process name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(MemoryError::ProcessNotFound("empty process name".to_string()));
        }
        if s.bytes().all(|b| b.is_ascii_digit()) {
            return s
                .parse()
                .map(ProcessTarget::Pid)
                .map_err(|_| MemoryError::ProcessNotFound(format!("PID out of range: {}", s)));
        }
        Ok(ProcessTarget::Name(s.to_string()))
    }
}

impl From<ProcessId> for ProcessTarget {
    fn from(pid: ProcessId) -> Self {
        ProcessTarget::Pid(pid)
    }
}

impl fmt::Display for ProcessTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessTarget::Name(name) => write!(f, "{}", name),
            ProcessTarget::Pid(pid) => write!(f, "PID {}", pid),
        }
    }
}
