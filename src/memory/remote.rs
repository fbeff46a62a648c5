//! The remote read capability consumed by the scanner

use crate::core::types::{Address, MemoryRange};

/// Copies bytes out of a target address space.
///
/// `read` fills as much of `buffer` as it can starting at `address` and
/// returns the number of bytes copied. Zero means nothing could be read;
/// the scanner treats it as the end of the scan and cannot tell an unmapped
/// page from a transient failure.
pub trait RemoteMemory: Send + Sync {
    fn read(&self, address: Address, buffer: &mut [u8]) -> usize;

    /// Whether the underlying handle can be used at all
    fn is_valid(&self) -> bool {
        true
    }
}

impl<T: RemoteMemory + ?Sized> RemoteMemory for &T {
    fn read(&self, address: Address, buffer: &mut [u8]) -> usize {
        (**self).read(address, buffer)
    }

    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }
}

/// Serves reads from a captured image of target memory.
///
/// Useful for scanning dumps and for exercising the scanner without a live
/// process.
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    base: Address,
    bytes: Vec<u8>,
}

impl SnapshotReader {
    /// Wraps `bytes` as if they were mapped at `base`
    pub fn new(base: Address, bytes: Vec<u8>) -> Self {
        SnapshotReader { base, bytes }
    }

    pub fn base(&self) -> Address {
        self.base
    }

    /// The range the snapshot covers
    pub fn range(&self) -> MemoryRange {
        MemoryRange::with_len(self.base, self.bytes.len())
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl RemoteMemory for SnapshotReader {
    fn read(&self, address: Address, buffer: &mut [u8]) -> usize {
        if address < self.base {
            return 0;
        }
        let offset = address.offset_from(self.base);
        match self.bytes.get(offset..) {
            Some(available) => {
                let len = available.len().min(buffer.len());
                buffer[..len].copy_from_slice(&available[..len]);
                len
            }
            None => 0,
        }
    }
}
