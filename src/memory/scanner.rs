//! Chunked pattern and text scanning over a remote address range
//!
//! A scan walks the range one chunk at a time through a single reusable
//! buffer. Reads are strictly sequential; matching inside a chunk is spread
//! over a rayon pool. Each chunk is matched on its own, so a match whose bytes
//! straddle two chunks is not reported. Pick a chunk size much larger than the
//! pattern to keep that rare.

use crate::core::types::{Address, MemoryError, MemoryRange, MemoryResult};
use crate::memory::buffer::ScratchBuffer;
use crate::memory::collector::{collect_offsets, MatchCollector};
use crate::memory::pattern::Pattern;
use crate::memory::remote::RemoteMemory;
use rayon::prelude::*;
use serde::Serialize;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Cooperative stop signal for text searches.
///
/// Checked once at the top of every chunk iteration; matching already running
/// for the current chunk finishes first. A token shared between several
/// searches is set by whichever one finds its text first, stopping the rest.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Outcome of a pattern scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Absolute match addresses, ascending and unique
    pub addresses: Vec<Address>,
    /// Chunks that returned at least one byte
    pub chunks_read: usize,
    /// Total bytes copied out of the target
    pub bytes_read: usize,
    /// A read returned zero bytes before the range was exhausted
    pub terminated_early: bool,
}

impl ScanReport {
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Lowest matching address
    pub fn first(&self) -> Option<Address> {
        self.addresses.first().copied()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Address> {
        self.addresses.iter()
    }

    pub fn into_addresses(self) -> Vec<Address> {
        self.addresses
    }
}

impl IntoIterator for ScanReport {
    type Item = Address;
    type IntoIter = std::vec::IntoIter<Address>;

    fn into_iter(self) -> Self::IntoIter {
        self.addresses.into_iter()
    }
}

#[derive(Debug, Default)]
struct WalkStats {
    chunks_read: usize,
    bytes_read: usize,
    terminated_early: bool,
    cancelled: bool,
}

/// Builds a dedicated pool of `threads` matching workers.
///
/// Zero lets rayon pick the worker count.
pub fn worker_pool(threads: usize) -> MemoryResult<Arc<rayon::ThreadPool>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|index| format!("sigscan-worker-{}", index))
        .build()?;
    Ok(Arc::new(pool))
}

/// Scan engine bound to one remote memory source
pub struct Scanner<'a, R: RemoteMemory + ?Sized> {
    reader: &'a R,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl<'a, R: RemoteMemory + ?Sized> Scanner<'a, R> {
    /// Creates a scanner that matches on the global rayon pool
    pub fn new(reader: &'a R) -> Self {
        Scanner { reader, pool: None }
    }

    /// Creates a scanner with a dedicated pool of `threads` workers.
    ///
    /// Zero lets rayon pick the worker count.
    pub fn with_threads(reader: &'a R, threads: usize) -> MemoryResult<Self> {
        Ok(Self::with_pool(reader, worker_pool(threads)?))
    }

    /// Creates a scanner that matches on an existing pool
    pub fn with_pool(reader: &'a R, pool: Arc<rayon::ThreadPool>) -> Self {
        Scanner {
            reader,
            pool: Some(pool),
        }
    }

    pub(crate) fn pool(&self) -> Option<&Arc<rayon::ThreadPool>> {
        self.pool.as_ref()
    }

    /// Number of matching workers
    pub fn threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }

    /// Finds every occurrence of a hex/wildcard `pattern` in `range`
    pub fn find_pattern(
        &self,
        pattern: &str,
        range: MemoryRange,
        chunk_size: usize,
    ) -> MemoryResult<ScanReport> {
        let pattern = Pattern::compile(pattern)?;
        self.find_pattern_compiled(&pattern, range, chunk_size)
    }

    /// Same as [`find_pattern`](Self::find_pattern) for an already compiled pattern
    pub fn find_pattern_compiled(
        &self,
        pattern: &Pattern,
        range: MemoryRange,
        chunk_size: usize,
    ) -> MemoryResult<ScanReport> {
        self.validate(pattern, range, chunk_size)?;
        debug!(%pattern, %range, chunk_size, threads = self.threads(), "pattern scan started");

        let mut collector = MatchCollector::new();
        let stats = self.walk_chunks(pattern, range, chunk_size, None, |chunk_start, data| {
            let offsets = self.match_chunk(pattern, data);
            trace!(chunk = %chunk_start, hits = offsets.len(), "chunk matched");
            collector.record_chunk(chunk_start, offsets);
            ControlFlow::Continue(())
        })?;

        let report = ScanReport {
            addresses: collector.into_sorted(),
            chunks_read: stats.chunks_read,
            bytes_read: stats.bytes_read,
            terminated_early: stats.terminated_early,
        };
        debug!(
            hits = report.len(),
            chunks = report.chunks_read,
            bytes = report.bytes_read,
            "pattern scan finished"
        );
        Ok(report)
    }

    /// Finds the lowest address holding `text`, encoded one byte per character
    pub fn find_text(
        &self,
        text: &str,
        range: MemoryRange,
        chunk_size: usize,
    ) -> MemoryResult<Option<Address>> {
        self.find_text_until(text, range, chunk_size, &CancelToken::new())
    }

    /// Text search that stops once `cancel` is set.
    ///
    /// The token is set by this call when it finds a match. `Ok(None)` means
    /// the text was not found before the range ended, a read came back empty
    /// or the token was cancelled.
    pub fn find_text_until(
        &self,
        text: &str,
        range: MemoryRange,
        chunk_size: usize,
        cancel: &CancelToken,
    ) -> MemoryResult<Option<Address>> {
        let pattern = Pattern::from_text(text)?;
        let (found, _) = self.search_text(&pattern, range, chunk_size, cancel)?;
        Ok(found)
    }

    fn search_text(
        &self,
        pattern: &Pattern,
        range: MemoryRange,
        chunk_size: usize,
        cancel: &CancelToken,
    ) -> MemoryResult<(Option<Address>, WalkStats)> {
        self.validate(pattern, range, chunk_size)?;
        debug!(len = pattern.len(), %range, chunk_size, "text scan started");

        let mut found = None;
        let stats = self.walk_chunks(pattern, range, chunk_size, Some(cancel), |chunk_start, data| {
            match self.first_in_chunk(pattern, data) {
                Some(offset) => {
                    found = chunk_start.checked_add(offset);
                    cancel.cancel();
                    ControlFlow::Break(())
                }
                None => ControlFlow::Continue(()),
            }
        })?;

        debug!(
            found = ?found,
            chunks = stats.chunks_read,
            cancelled = stats.cancelled,
            "text scan finished"
        );
        Ok((found, stats))
    }

    fn validate(&self, pattern: &Pattern, range: MemoryRange, chunk_size: usize) -> MemoryResult<()> {
        if pattern.is_empty() {
            return Err(MemoryError::InvalidPattern("Empty pattern".to_string()));
        }
        if chunk_size == 0 {
            return Err(MemoryError::invalid_range(
                range.start,
                range.end,
                "chunk size must be at least one byte",
            ));
        }
        if range.is_inverted() {
            return Err(MemoryError::invalid_range(
                range.start,
                range.end,
                "start lies above end",
            ));
        }
        if range.len() < pattern.len() {
            return Err(MemoryError::invalid_range(
                range.start,
                range.end,
                format!(
                    "range of {} bytes is shorter than the {}-byte pattern",
                    range.len(),
                    pattern.len()
                ),
            ));
        }
        if !self.reader.is_valid() {
            return Err(MemoryError::InvalidHandle(
                "Process handle is not valid".to_string(),
            ));
        }
        Ok(())
    }

    /// Streams `range` through one scratch buffer, handing each filled chunk
    /// to `on_chunk`. Reads are clamped to the range end.
    fn walk_chunks<F>(
        &self,
        pattern: &Pattern,
        range: MemoryRange,
        chunk_size: usize,
        cancel: Option<&CancelToken>,
        mut on_chunk: F,
    ) -> MemoryResult<WalkStats>
    where
        F: FnMut(Address, &[u8]) -> ControlFlow<()>,
    {
        // No read ever asks for more than the range holds
        let mut buffer = ScratchBuffer::acquire(chunk_size.min(range.len()))?;
        let mut stats = WalkStats::default();

        let last_start = range.end.as_usize() - pattern.len();
        let mut cursor = range.start.as_usize();

        while cursor <= last_start {
            if cancel.is_some_and(CancelToken::is_cancelled) {
                stats.cancelled = true;
                break;
            }

            let wanted = chunk_size.min(range.end.as_usize() - cursor);
            let chunk_start = Address::new(cursor);
            let read = self
                .reader
                .read(chunk_start, &mut buffer.as_mut_slice()[..wanted])
                .min(wanted);

            if read == 0 {
                debug!(at = %chunk_start, "read returned no bytes, ending scan");
                stats.terminated_early = true;
                break;
            }

            stats.chunks_read += 1;
            stats.bytes_read += read;
            trace!(chunk = %chunk_start, read, "chunk read");

            if on_chunk(chunk_start, buffer.filled(read)).is_break() {
                break;
            }

            cursor = match cursor.checked_add(chunk_size) {
                Some(next) => next,
                None => break,
            };
        }

        Ok(stats)
    }

    fn match_chunk(&self, pattern: &Pattern, data: &[u8]) -> Vec<usize> {
        if data.len() < pattern.len() {
            return Vec::new();
        }
        let last = data.len() - pattern.len();
        self.install(|| collect_offsets(0..=last, |offset| pattern.matches_at(data, offset)))
    }

    fn first_in_chunk(&self, pattern: &Pattern, data: &[u8]) -> Option<usize> {
        if data.len() < pattern.len() {
            return None;
        }
        let last = data.len() - pattern.len();
        self.install(|| {
            (0..=last)
                .into_par_iter()
                .find_first(|&offset| pattern.matches_at(data, offset))
        })
    }

    fn install<T, OP>(&self, op: OP) -> T
    where
        OP: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
