//! Filter-and-verify string similarity joins under edit-distance constraints.
//!
//! Given two tables, each with a key column and a string join column, a
//! threshold τ and a comparison operator, [`edit_distance_join`] returns
//! every row pair whose join strings are within Levenshtein distance τ
//! (or exactly at it, or strictly under it, per the operator). The naive
//! quadratic comparison is avoided with two necessary-condition filters:
//!
//! 1. **Prefix filter.** Q-grams are globally ordered by ascending document
//!    frequency. Two strings within distance τ must share at least one
//!    q-gram among the first `q·τ + 1` of their ordered token vectors, so
//!    only the left rows found through a prefix inverted index are ever
//!    considered.
//! 2. **Length filter.** Candidates whose token counts differ by more than
//!    τ cannot qualify and are dropped before verification.
//!
//! Survivors are verified with a bounded Levenshtein kernel that abandons
//! the DP as soon as the threshold is unreachable.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐    ┌─────────────┐    ┌────────────┐    ┌─────────────┐
//! │ tokenize   │───▶│ ordering    │───▶│ index      │───▶│ candidates  │
//! │ (q-grams)  │    │ (freq ids)  │    │ (prefix    │    │ (probe +    │
//! │            │    │             │    │  postings) │    │  verify)    │
//! └────────────┘    └─────────────┘    └────────────┘    └─────────────┘
//!                                                              │
//!       ┌────────────┐    ┌────────────┐    ┌─────────────┐    │
//!       │ join       │◀───│ driver     │◀───│ levenshtein │◀───┘
//!       │ (validate, │    │ (partition │    │ (bounded    │
//!       │  assemble) │    │  + rayon)  │    │  DP kernel) │
//!       └────────────┘    └────────────┘    └─────────────┘
//! ```
//!
//! # Approximation contract
//!
//! The join is approximate: candidate generation sees only q-grams, so a
//! pair of strings sharing **no** q-gram is never discovered, whatever its
//! edit distance. In particular strings shorter than q produce no q-grams
//! and never appear in the output, not even paired with themselves. Every
//! pair that *is* emitted carries its exact distance.
//!
//! # Usage
//!
//! ```
//! use simjoin::{edit_distance_join, JoinOptions, QgramTokenizer, Table, Value};
//!
//! let mut left = Table::new(vec!["id", "name"]);
//! left.push_row(vec![Value::Int(0), Value::from("kitten")]);
//! let mut right = Table::new(vec!["id", "name"]);
//! right.push_row(vec![Value::Int(0), Value::from("mitten")]);
//!
//! let mut tokenizer = QgramTokenizer::new(2);
//! let pairs = edit_distance_join(
//!     &left, &right, "id", "id", "name", "name",
//!     1.0, &mut tokenizer, &JoinOptions::default(),
//! ).unwrap();
//! assert_eq!(pairs.len(), 1);
//! ```
//!
//! With the default `parallel` feature, the right table is split into
//! contiguous partitions verified on rayon's thread pool; the `n_jobs`
//! option caps the parallelism. The output never depends on the job count.

// Module declarations
mod candidates;
mod driver;
mod error;
mod exact;
mod index;
mod join;
mod levenshtein;
mod missing;
mod ordering;
mod table;
mod tokenize;
mod types;
mod validate;

// Re-exports for public API
pub use error::JoinError;
pub use exact::exact_join;
pub use index::{prefix_length, PrefixIndex};
pub use join::edit_distance_join;
pub use levenshtein::edit_distance_bounded;
pub use ordering::TokenOrdering;
pub use table::{Table, Value};
pub use tokenize::{MultisetGuard, QgramTokenizer, Tokenizer};
pub use types::{CompOp, JoinOptions, TokenId};
