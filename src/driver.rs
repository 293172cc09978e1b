// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Parallel execution of the candidate pipeline.
//!
//! The right-side row range is split into contiguous near-equal partitions,
//! one task per partition. Every task reads the same immutable index,
//! vectors, and strings, and writes only to buffers it owns, so the whole
//! phase runs without locks. Task outputs are concatenated in partition
//! order, which makes the result independent of scheduling.
//!
//! With the `parallel` feature the tasks run on rayon's pool; the number of
//! concurrently running tasks never exceeds the partition count, so the
//! resolved job count is an upper bound on parallelism. Without the feature
//! the partitions run back to back on the calling thread and produce the
//! same output.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::candidates::enumerate_and_verify;
use crate::index::PrefixIndex;
use crate::types::{CompOp, TokenId};
use std::collections::HashSet;
use std::ops::Range;

/// Read-only state shared by every partition task.
pub(crate) struct JoinShared<'a> {
    pub index: &'a PrefixIndex,
    pub left_strings: &'a [String],
    pub right_strings: &'a [String],
    pub right_vectors: &'a [Vec<TokenId>],
    pub qval: usize,
    pub tau: usize,
    pub comp_op: CompOp,
}

/// Pair and score buffers owned by one partition task.
#[derive(Debug, Default)]
pub(crate) struct TaskOutput {
    /// `(left_row, right_row)` in compacted row ids.
    pub pairs: Vec<(u32, u32)>,
    pub scores: Vec<usize>,
}

/// Resolve a requested job count against the machine.
///
/// `1` means sequential. Negative counts are relative to the CPU count:
/// `-1` is all CPUs, `-k` is `CPUs + 1 - k`. Requests resolving below 1
/// fall back to sequential.
pub(crate) fn resolve_n_jobs(n_jobs: i32) -> usize {
    if n_jobs >= 1 {
        return n_jobs as usize;
    }
    if n_jobs == 0 {
        return 1;
    }
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(1);
    let resolved = cpus + 1 + i64::from(n_jobs);
    if resolved < 1 {
        1
    } else {
        resolved as usize
    }
}

/// Split `[0, len)` into `n` contiguous near-equal ranges.
///
/// The first `len % n` ranges carry one extra row. Empty ranges are never
/// produced; callers clamp `n` to `len` first.
pub(crate) fn partition_ranges(len: usize, n: usize) -> Vec<Range<usize>> {
    let base = len / n;
    let extra = len % n;
    let mut ranges = Vec::with_capacity(n);
    let mut start = 0;
    for k in 0..n {
        let size = base + usize::from(k < extra);
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Run the candidate pipeline for one partition of right rows.
///
/// Output pairs are in ascending right-row order; within one right row the
/// order follows candidate-set iteration and is unspecified.
fn run_partition(shared: &JoinShared<'_>, range: Range<usize>) -> TaskOutput {
    let mut out = TaskOutput::default();
    let mut candidates: HashSet<u32> = HashSet::new();

    for r in range {
        enumerate_and_verify(
            shared.index,
            shared.left_strings,
            r as u32,
            &shared.right_strings[r],
            &shared.right_vectors[r],
            shared.qval,
            shared.tau,
            shared.comp_op,
            &mut candidates,
            &mut out.pairs,
            &mut out.scores,
        );
    }

    out
}

/// Run all partitions and concatenate their outputs in partition order.
pub(crate) fn run(shared: &JoinShared<'_>, n_jobs: usize) -> TaskOutput {
    let num_rows = shared.right_strings.len();
    let n = n_jobs.clamp(1, num_rows.max(1));

    if n <= 1 || num_rows == 0 {
        return run_partition(shared, 0..num_rows);
    }

    let outputs = run_partitions(shared, partition_ranges(num_rows, n));

    let mut merged = TaskOutput {
        pairs: Vec::with_capacity(outputs.iter().map(|o| o.pairs.len()).sum()),
        scores: Vec::with_capacity(outputs.iter().map(|o| o.scores.len()).sum()),
    };
    for out in outputs {
        merged.pairs.extend(out.pairs);
        merged.scores.extend(out.scores);
    }
    merged
}

#[cfg(feature = "parallel")]
fn run_partitions(shared: &JoinShared<'_>, ranges: Vec<Range<usize>>) -> Vec<TaskOutput> {
    // collect() keeps partition order regardless of completion order.
    ranges
        .into_par_iter()
        .map(|range| run_partition(shared, range))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn run_partitions(shared: &JoinShared<'_>, ranges: Vec<Range<usize>>) -> Vec<TaskOutput> {
    ranges
        .into_iter()
        .map(|range| run_partition(shared, range))
        .collect()
}
