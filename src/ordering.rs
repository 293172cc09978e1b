// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Global token ordering by ascending document frequency.
//!
//! Every distinct q-gram across both input sides gets a dense integer id;
//! rarer q-grams get smaller ids, ties broken by q-gram bytes. Sorting a
//! row's tokens by id then concentrates its rarest q-grams at the front,
//! which is exactly where the prefix filter looks. Rare tokens also have
//! short posting lists, so the candidate sets they generate stay small.
//!
//! # Invariants
//!
//! - **ID_DENSE**: ids cover `[0, V)` where V is the distinct q-gram count.
//! - **ID_BY_FREQUENCY**: `id(a) < id(b)` iff `(freq(a), bytes(a)) <
//!   (freq(b), bytes(b))`, with frequency summed over both sides.
//! - Deterministic: the same two inputs always produce the same mapping.

use crate::tokenize::Tokenizer;
use crate::types::TokenId;
use std::collections::HashMap;

/// Frequency-ordered mapping from q-gram bytes to dense token ids.
#[derive(Debug, Default)]
pub struct TokenOrdering {
    ids: HashMap<Vec<u8>, TokenId>,
}

impl TokenOrdering {
    /// Build the ordering over every string of both sides.
    ///
    /// A q-gram occurring on only one side still gets its combined count;
    /// the other side simply contributes zero.
    pub fn build<T: Tokenizer + ?Sized>(
        tokenizer: &T,
        left: &[String],
        right: &[String],
    ) -> Self {
        let mut freq: HashMap<Vec<u8>, u64> = HashMap::new();
        for s in left.iter().chain(right.iter()) {
            for gram in tokenizer.tokenize(s) {
                match freq.get_mut(gram) {
                    Some(count) => *count += 1,
                    None => {
                        freq.insert(gram.to_vec(), 1);
                    }
                }
            }
        }

        // HashMap iteration order is arbitrary; sort by (frequency, bytes)
        // so the id assignment is reproducible across runs.
        let mut grams: Vec<(Vec<u8>, u64)> = freq.into_iter().collect();
        grams.sort_unstable_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let ids = grams
            .into_iter()
            .enumerate()
            .map(|(id, (gram, _))| (gram, TokenId(id as u32)))
            .collect();

        TokenOrdering { ids }
    }

    /// Number of distinct q-grams (the V in token ids `[0, V)`).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no q-gram was observed on either side.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The id assigned to a q-gram, if it was observed during build.
    pub fn id(&self, gram: &[u8]) -> Option<TokenId> {
        self.ids.get(gram).copied()
    }

    /// Tokenize a string and return its token ids sorted ascending,
    /// duplicates retained.
    ///
    /// Q-grams unseen at build time are dropped; for strings drawn from the
    /// build corpus every q-gram resolves.
    pub fn ordered_ids<T: Tokenizer + ?Sized>(&self, tokenizer: &T, s: &str) -> Vec<TokenId> {
        let mut ids: Vec<TokenId> = tokenizer
            .tokenize(s)
            .into_iter()
            .filter_map(|gram| self.id(gram))
            .collect();
        ids.sort_unstable();
        ids
    }
}
