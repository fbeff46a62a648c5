//! Match accumulation and ordering

use crate::core::types::Address;
use rayon::prelude::*;

/// Collects absolute match addresses across all chunks of one scan.
///
/// Workers never share this value; each chunk's hits are gathered into
/// per-worker vectors first and merged here from the scan thread.
#[derive(Debug, Default)]
pub struct MatchCollector {
    hits: Vec<Address>,
}

impl MatchCollector {
    pub fn new() -> Self {
        MatchCollector::default()
    }

    /// Records the chunk-relative `offsets` found in a chunk read at `chunk_start`
    pub fn record_chunk(&mut self, chunk_start: Address, offsets: Vec<usize>) {
        self.hits.extend(
            offsets
                .into_iter()
                .filter_map(|offset| chunk_start.checked_add(offset)),
        );
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Consumes the collector, returning ascending duplicate-free addresses
    pub fn into_sorted(mut self) -> Vec<Address> {
        self.hits.par_sort_unstable();
        self.hits.dedup();
        self.hits
    }
}

/// Matches `offsets` in parallel with per-worker local buffers.
///
/// `is_match` must only read shared state. The merged vector is in
/// ascending offset order.
pub(crate) fn collect_offsets<F>(offsets: std::ops::RangeInclusive<usize>, is_match: F) -> Vec<usize>
where
    F: Fn(usize) -> bool + Sync + Send,
{
    offsets
        .into_par_iter()
        .fold(Vec::new, |mut local, offset| {
            if is_match(offset) {
                local.push(offset);
            }
            local
        })
        .reduce(Vec::new, |mut left, mut right| {
            left.append(&mut right);
            left
        })
}
