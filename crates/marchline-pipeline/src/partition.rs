//! Block partitioning of an index range across a fixed worker pool.
//!
//! Every write phase of the pipeline hands each worker a contiguous
//! half-open range of the primary iteration index. The ranges over all
//! workers cover the full domain exactly, with no gaps and no overlaps;
//! that exact cover is the ownership contract that lets workers mutate
//! the shared buffers without locks.

use std::ops::Range;

/// Compute the half-open index range assigned to one worker.
///
/// Classic block partitioning: every worker receives `total / count`
/// indices and the first `total % count` workers take one extra, so the
/// union over `worker` in `0..count` is exactly `0..total`.
///
/// `count` must be nonzero; the coordinator validates the worker count
/// before any range is computed.
#[must_use]
pub fn block_range(total: usize, worker: usize, count: usize) -> Range<usize> {
    debug_assert!(count > 0, "worker count must be nonzero");
    let base = total / count;
    let extra = total % count;
    let start = worker * base + worker.min(extra);
    let len = base + usize::from(worker < extra);
    start..start + len
}
