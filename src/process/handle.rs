//! Read-only process handle exposing the remote read capability

use super::platform::PlatformHandle;
use crate::core::types::{Address, MemoryResult, ModuleBounds, ProcessId};
use crate::memory::RemoteMemory;
use std::fmt;

/// Read access to one running process.
///
/// Exactly one platform backend is compiled in: `ReadProcessMemory` on
/// Windows, `process_vm_readv` on Linux.
pub struct ProcessHandle {
    inner: PlatformHandle,
    pid: ProcessId,
}

impl ProcessHandle {
    /// Open a process for reading memory
    pub fn open_for_read(pid: ProcessId) -> MemoryResult<Self> {
        let inner = PlatformHandle::open(pid)?;
        Ok(ProcessHandle { inner, pid })
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Check if handle is valid
    pub fn is_valid(&self) -> bool {
        self.inner.is_valid()
    }

    /// Resolve the bounds of the process's executable image
    pub fn main_module(&self) -> MemoryResult<ModuleBounds> {
        self.inner.main_module(self.pid)
    }
}

impl RemoteMemory for ProcessHandle {
    fn read(&self, address: Address, buffer: &mut [u8]) -> usize {
        self.inner.read(address, buffer)
    }

    fn is_valid(&self) -> bool {
        ProcessHandle::is_valid(self)
    }
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("valid", &self.is_valid())
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ProcessHandle(pid={}, valid={})",
            self.pid,
            self.is_valid()
        )
    }
}
