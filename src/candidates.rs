// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Candidate enumeration and verification for one right row.
//!
//! Probes the prefix index with the right row's prefix tokens, unions the
//! posting lists into a candidate set, then runs every candidate through the
//! length filter and the bounded distance kernel. Survivors are appended to
//! the caller's pair and score buffers.
//!
//! The candidate set is caller-owned so its allocation is reused across the
//! right rows of a partition.

use crate::index::{prefix_length, PrefixIndex};
use crate::levenshtein::edit_distance_bounded;
use crate::types::{CompOp, TokenId};
use std::collections::HashSet;

/// Enumerate and verify the candidates of one right row.
///
/// Emits `(left_row, right_row)` pairs and their distances for every left
/// row whose string satisfies `distance comp_op tau`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn enumerate_and_verify(
    index: &PrefixIndex,
    left_strings: &[String],
    right_row: u32,
    right_string: &str,
    right_vector: &[TokenId],
    qval: usize,
    tau: usize,
    comp_op: CompOp,
    candidates: &mut HashSet<u32>,
    pairs: &mut Vec<(u32, u32)>,
    scores: &mut Vec<usize>,
) {
    candidates.clear();

    let p = prefix_length(right_vector.len(), qval, tau);
    let mut prev = None;
    for &token in &right_vector[..p] {
        // Sorted vector: identical prefix tokens probe the same list.
        if prev == Some(token) {
            continue;
        }
        prev = Some(token);
        if let Some(list) = index.probe(token) {
            candidates.extend(list.iter().copied());
        }
    }

    let m = right_vector.len();
    for &cand in candidates.iter() {
        // Length filter in token-count space: |m_left - m_right| <= tau.
        let ml = index.num_tokens(cand);
        if ml.abs_diff(m) > tau {
            continue;
        }

        let d = edit_distance_bounded(
            left_strings[cand as usize].as_bytes(),
            right_string.as_bytes(),
            tau,
        );
        if comp_op.eval(d, tau) {
            pairs.push((cand, right_row));
            scores.push(d);
        }
    }
}
