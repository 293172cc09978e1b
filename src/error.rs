// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Join validation errors.
//!
//! Every variant here is raised before any index is built or any distance is
//! computed. Once validation passes, the core pipeline has no recoverable
//! failure modes of its own.

use thiserror::Error;

/// Reasons a join request is rejected during validation.
#[derive(Debug, Error)]
pub enum JoinError {
    /// The table itself is malformed (duplicate column names, ragged rows).
    #[error("invalid {table}: {reason}")]
    InvalidInputTable {
        table: &'static str,
        reason: String,
    },

    /// A named key or join column does not exist.
    #[error("{attr_label} {attr:?} not found in {table}")]
    UnknownAttribute {
        attr: String,
        attr_label: &'static str,
        table: &'static str,
    },

    /// The join column holds non-string values.
    #[error("join attribute {attr:?} in {table} must be textual, not numeric")]
    NonTextualJoinAttribute {
        attr: String,
        table: &'static str,
    },

    /// The tokenizer is not a usable q-gram tokenizer.
    #[error("tokenizer must be a q-gram tokenizer with qval >= 1")]
    InvalidTokenizer,

    /// The threshold is negative or not a finite number.
    #[error("threshold must be a finite non-negative number, got {0}")]
    InvalidThreshold(f64),

    /// The comparison operator string is not one of `<=`, `<`, `=`.
    #[error("unknown comparison operator {0:?}, expected \"<=\", \"<\" or \"=\"")]
    InvalidComparisonOperator(String),

    /// A requested output column does not exist.
    #[error("output attribute {attr:?} not found in {table}")]
    InvalidOutputAttribute {
        attr: String,
        table: &'static str,
    },

    /// A key column contains nulls or duplicate values.
    #[error("key attribute {attr:?} in {table} must be unique and non-null")]
    NonUniqueOrMissingKey {
        attr: String,
        table: &'static str,
    },
}
