//! Caller-owned scanning session for one attached process

use super::handle::ProcessHandle;
use super::target::ProcessTarget;
use crate::config::ScannerConfig;
use crate::core::types::{Address, MemoryResult, ModuleBounds, ProcessId};
use crate::memory::{worker_pool, ScanReport, Scanner};
use rayon::ThreadPool;
use std::sync::Arc;
use tracing::info;

/// An open process, its main module bounds and the scanner settings.
///
/// Sessions are independent values; several may target different (or the
/// same) processes at once, and a session may be shared by reference across
/// threads running concurrent scans. The matching workers are started once
/// when the session opens and serve every scan it runs.
#[derive(Debug)]
pub struct ProcessSession {
    handle: ProcessHandle,
    module: ModuleBounds,
    config: ScannerConfig,
    pool: Arc<ThreadPool>,
}

impl ProcessSession {
    /// Resolves `target`, opens it for reading and locates its main module
    pub fn open(target: &ProcessTarget, config: ScannerConfig) -> MemoryResult<Self> {
        let pid = target.resolve()?;
        let handle = ProcessHandle::open_for_read(pid)?;
        let module = handle.main_module()?;
        let pool = worker_pool(config.max_threads)?;

        info!(
            process = %target,
            pid,
            module = %module.name,
            base = %module.base,
            end = %module.end,
            workers = pool.current_num_threads(),
            "attached to process"
        );

        Ok(ProcessSession {
            handle,
            module,
            config,
            pool,
        })
    }

    /// Opens a process by PID with default scanner settings
    pub fn open_pid(pid: ProcessId) -> MemoryResult<Self> {
        Self::open(&ProcessTarget::Pid(pid), ScannerConfig::default())
    }

    pub fn pid(&self) -> ProcessId {
        self.handle.pid()
    }

    pub fn module(&self) -> &ModuleBounds {
        &self.module
    }

    pub fn handle(&self) -> &ProcessHandle {
        &self.handle
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// A scanner over this process on the session's worker pool
    pub fn scanner(&self) -> Scanner<'_, ProcessHandle> {
        Scanner::with_pool(&self.handle, Arc::clone(&self.pool))
    }

    /// Finds `pattern` across the main module
    pub fn find_pattern(&self, pattern: &str) -> MemoryResult<ScanReport> {
        self.scanner()
            .find_pattern(pattern, self.module.range(), self.config.chunk_size)
    }

    /// Finds the first occurrence of `text` in the main module
    pub fn find_text(&self, text: &str) -> MemoryResult<Option<Address>> {
        self.scanner()
            .find_text(text, self.module.range(), self.config.chunk_size)
    }
}
