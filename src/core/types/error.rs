//! Custom error types for remote scanning

use super::Address;
use thiserror::Error;

/// Main error type for scan and process operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid pattern format: {0}")]
    InvalidPattern(String),

    #[error("Invalid scan range {start}..{end}: {reason}")]
    InvalidRange {
        start: Address,
        end: Address,
        reason: String,
    },

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Access denied to process {pid}: {reason}")]
    AccessDenied { pid: u32, reason: String },

    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Module not found: {0}")]
    ModuleNotFound(String),

    #[error("Failed to allocate scan buffer of {size} bytes")]
    AllocationFailed { size: usize },

    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates an access denied error for a process
    pub fn access_denied(pid: u32, reason: impl Into<String>) -> Self {
        MemoryError::AccessDenied {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates an invalid range error
    pub fn invalid_range(start: Address, end: Address, reason: impl Into<String>) -> Self {
        MemoryError::InvalidRange {
            start,
            end,
            reason: reason.into(),
        }
    }

    /// Whether the error means the target process could not be reached
    pub fn is_process_access(&self) -> bool {
        matches!(
            self,
            MemoryError::ProcessNotFound(_)
                | MemoryError::AccessDenied { .. }
                | MemoryError::InvalidHandle(_)
                | MemoryError::ModuleNotFound(_)
        )
    }
}
