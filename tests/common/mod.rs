#![allow(dead_code)]

use remote_sigscan::{Address, MemoryRange, RemoteMemory, SnapshotReader};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BASE: usize = 0x7ff6_0000_0000;

/// Snapshot-backed reader that counts every read request
pub struct CountingReader {
    inner: SnapshotReader,
    reads: AtomicUsize,
    valid: bool,
}

impl CountingReader {
    pub fn new(bytes: Vec<u8>) -> Self {
        CountingReader {
            inner: SnapshotReader::new(Address::new(BASE), bytes),
            reads: AtomicUsize::new(0),
            valid: true,
        }
    }

    /// A reader whose handle reports itself invalid
    pub fn invalid(bytes: Vec<u8>) -> Self {
        CountingReader {
            valid: false,
            ..Self::new(bytes)
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn range(&self) -> MemoryRange {
        self.inner.range()
    }
}

impl RemoteMemory for CountingReader {
    fn read(&self, address: Address, buffer: &mut [u8]) -> usize {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(address, buffer)
    }

    fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Deterministic filler that never contains `0xCC`
pub fn filler(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 0xCB) as u8).collect()
}

pub fn place(image: &mut [u8], at: usize, bytes: &[u8]) {
    image[at..at + bytes.len()].copy_from_slice(bytes);
}

pub fn addr(offset: usize) -> Address {
    Address::new(BASE + offset)
}
