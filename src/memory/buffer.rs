//! Scope-bound scratch buffer for chunked reads

use crate::core::types::{MemoryError, MemoryResult};
use tracing::trace;

/// Chunk sizes up to this many bytes are served from inline storage
pub const INLINE_CAPACITY: usize = 1024;

enum Storage {
    Inline([u8; INLINE_CAPACITY]),
    Heap(Vec<u8>),
}

/// Fixed-capacity buffer reused for every chunk of one scan call.
///
/// The storage is released when the value is dropped, so every exit path of
/// the scan loop (completion, early exit, error) gives it back exactly once.
pub struct ScratchBuffer {
    storage: Storage,
    capacity: usize,
}

impl ScratchBuffer {
    /// Acquires a buffer of `capacity` bytes.
    ///
    /// Heap allocation failure is reported as `AllocationFailed` instead of
    /// aborting the process.
    pub fn acquire(capacity: usize) -> MemoryResult<Self> {
        let storage = if capacity <= INLINE_CAPACITY {
            Storage::Inline([0u8; INLINE_CAPACITY])
        } else {
            let mut heap = Vec::new();
            heap.try_reserve_exact(capacity)
                .map_err(|_| MemoryError::AllocationFailed { size: capacity })?;
            heap.resize(capacity, 0);
            Storage::Heap(heap)
        };

        trace!(capacity, inline = capacity <= INLINE_CAPACITY, "scratch buffer acquired");
        Ok(ScratchBuffer { storage, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the buffer lives in inline storage
    pub fn is_inline(&self) -> bool {
        matches!(self.storage, Storage::Inline(_))
    }

    /// The full writable region handed to the reader
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Inline(bytes) => &mut bytes[..self.capacity],
            Storage::Heap(bytes) => bytes.as_mut_slice(),
        }
    }

    /// The first `len` bytes, clamped to capacity
    pub fn filled(&self, len: usize) -> &[u8] {
        let len = len.min(self.capacity);
        match &self.storage {
            Storage::Inline(bytes) => &bytes[..len],
            Storage::Heap(bytes) => &bytes[..len],
        }
    }
}

impl Drop for ScratchBuffer {
    fn drop(&mut self) {
        trace!(capacity = self.capacity, "scratch buffer released");
    }
}
