// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Q-gram prefix inverted index over the left table.
//!
//! Maps a token id to the row ids whose ordered prefix contains that token,
//! plus a parallel vector of per-row token counts for the length filter.
//! Only the first `min(q*tau + 1, m)` tokens of each row are indexed; by the
//! prefix-filter argument, two strings within edit distance tau must share
//! at least one token in these prefixes, so probing with a right row's
//! prefix cannot miss a qualifying left row that shares any q-gram at all.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTING_LIST_SORTED**: each posting list is sorted by row id.
//! 2. **POSTING_LIST_DEDUP**: a row id appears at most once per list, even
//!    when a duplicated q-gram lands in the row's prefix twice.
//! 3. **SIZES_COMPLETE**: `sizes` has one entry per indexed row, equal to
//!    that row's full token count (not the prefix length).
//! 4. Build is single-threaded; after build the index is immutable and read
//!    concurrently without locks.

use crate::types::TokenId;
use std::collections::HashMap;

/// Prefix length for a token vector of `num_tokens` tokens.
///
/// Saturating so that absurdly large thresholds degrade to indexing the
/// whole vector instead of overflowing.
#[inline]
pub fn prefix_length(num_tokens: usize, qval: usize, tau: usize) -> usize {
    qval.saturating_mul(tau).saturating_add(1).min(num_tokens)
}

/// Inverted index over the ordered-prefix tokens of the left rows.
#[derive(Debug, Default)]
pub struct PrefixIndex {
    postings: HashMap<TokenId, Vec<u32>>,
    sizes: Vec<u32>,
}

impl PrefixIndex {
    /// Build the index from the left side's ordered token vectors.
    pub fn build(vectors: &[Vec<TokenId>], qval: usize, tau: usize) -> Self {
        let mut postings: HashMap<TokenId, Vec<u32>> = HashMap::new();
        let mut sizes = Vec::with_capacity(vectors.len());

        for (row, vector) in vectors.iter().enumerate() {
            sizes.push(vector.len() as u32);

            let p = prefix_length(vector.len(), qval, tau);
            let mut prev = None;
            for &token in &vector[..p] {
                // Vectors are sorted, so duplicate tokens are adjacent;
                // skipping repeats keeps one posting per (token, row).
                if prev == Some(token) {
                    continue;
                }
                prev = Some(token);
                postings.entry(token).or_default().push(row as u32);
            }
        }

        PrefixIndex { postings, sizes }
    }

    /// The posting list for a token, if any prefix contains it.
    #[inline]
    pub fn probe(&self, token: TokenId) -> Option<&[u32]> {
        self.postings.get(&token).map(Vec::as_slice)
    }

    /// Full token count of an indexed row.
    #[inline]
    pub fn num_tokens(&self, row: u32) -> usize {
        self.sizes[row as usize] as usize
    }

    /// Number of indexed rows.
    pub fn num_rows(&self) -> usize {
        self.sizes.len()
    }

    /// Number of distinct tokens with a non-empty posting list.
    pub fn num_posting_lists(&self) -> usize {
        self.postings.len()
    }

    /// Total postings across all lists.
    pub fn num_postings(&self) -> usize {
        self.postings.values().map(Vec::len).sum()
    }
}

/// Check index invariants (debug assertion).
#[cfg(any(debug_assertions, test))]
#[allow(dead_code)]
pub fn check_prefix_index_well_formed(index: &PrefixIndex, num_rows: usize) -> bool {
    if index.sizes.len() != num_rows {
        return false;
    }
    for list in index.postings.values() {
        if list.is_empty() {
            return false;
        }
        for i in 1..list.len() {
            // Sorted and strictly increasing implies deduplicated.
            if list[i - 1] >= list[i] {
                return false;
            }
        }
        if list.iter().any(|&row| row as usize >= num_rows) {
            return false;
        }
    }
    true
}
