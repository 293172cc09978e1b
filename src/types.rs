// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Core types shared across the join pipeline.
//!
//! | Type | Purpose |
//! |------------------|----------------------------------------------|
//! | `TokenId` | Dense q-gram identifier in frequency order |
//! | `CompOp` | Comparison operator applied at emission |
//! | `JoinOptions` | Output shaping and parallelism knobs |
//! | `ProjectedSide` | One input table reduced to key/join/out cells |
//!
//! # Invariants
//!
//! - **TOKEN_ID_DENSE**: `TokenId`s handed out by a token ordering cover
//!   `[0, V)` with no gaps; smaller id means rarer q-gram.
//! - **PROJECTION_ALIGNED**: the `keys`, `joins` and `outs` vectors of a
//!   `ProjectedSide` all have one entry per retained input row, in input
//!   order.

use crate::error::JoinError;
use crate::table::{Table, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Dense identifier of a distinct q-gram under the global token ordering.
///
/// Prevents accidentally mixing row ids and token ids, which are both small
/// integers in this codebase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct TokenId(pub u32);

impl TokenId {
    /// Get the underlying value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for TokenId {
    fn from(id: u32) -> Self {
        TokenId(id)
    }
}

/// Comparison operator applied to the verified edit distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompOp {
    /// `distance <= threshold`
    Le,
    /// `distance < threshold`
    Lt,
    /// `distance == threshold`
    Eq,
}

impl CompOp {
    /// Does a verified distance satisfy the predicate at this threshold?
    #[inline]
    pub fn eval(self, distance: usize, threshold: usize) -> bool {
        match self {
            CompOp::Le => distance <= threshold,
            CompOp::Lt => distance < threshold,
            CompOp::Eq => distance == threshold,
        }
    }

    /// The source form of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            CompOp::Le => "<=",
            CompOp::Lt => "<",
            CompOp::Eq => "=",
        }
    }
}

impl FromStr for CompOp {
    type Err = JoinError;

    fn from_str(s: &str) -> Result<Self, JoinError> {
        match s {
            "<=" => Ok(CompOp::Le),
            "<" => Ok(CompOp::Lt),
            "=" => Ok(CompOp::Eq),
            other => Err(JoinError::InvalidComparisonOperator(other.to_string())),
        }
    }
}

impl fmt::Display for CompOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output shaping and parallelism options for the join entry points.
///
/// The defaults mirror the common case: `<=` comparison, no extra output
/// attributes, `l_`/`r_` prefixes, score column on, sequential execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinOptions {
    /// Operator applied to the verified distance at emission.
    pub comp_op: CompOp,
    /// Pair rows with a missing join value against the whole other side.
    pub allow_missing: bool,
    /// Extra left-table columns to project into the output.
    pub l_out_attrs: Option<Vec<String>>,
    /// Extra right-table columns to project into the output.
    pub r_out_attrs: Option<Vec<String>>,
    /// Prefix for left-side output column names.
    pub l_out_prefix: String,
    /// Prefix for right-side output column names.
    pub r_out_prefix: String,
    /// Append a `_sim_score` column holding the integer edit distance.
    pub out_sim_score: bool,
    /// Desired parallelism. `1` is sequential, `-1` all CPUs, `-k` means
    /// `CPUs + 1 - k`; anything resolving below 1 falls back to sequential.
    pub n_jobs: i32,
}

impl Default for JoinOptions {
    fn default() -> Self {
        JoinOptions {
            comp_op: CompOp::Le,
            allow_missing: false,
            l_out_attrs: None,
            r_out_attrs: None,
            l_out_prefix: "l_".to_string(),
            r_out_prefix: "r_".to_string(),
            out_sim_score: true,
            n_jobs: 1,
        }
    }
}

/// One input table reduced to the cells the join needs: key, join string,
/// and projected output attributes, one entry per input row.
///
/// `joins[i]` is `None` when row `i` has a missing join value. Such rows are
/// excluded from the core join but kept here so missing-value pairing and
/// output assembly can still reach their key and output cells.
#[derive(Debug)]
pub(crate) struct ProjectedSide {
    pub keys: Vec<Value>,
    pub joins: Vec<Option<String>>,
    pub outs: Vec<Vec<Value>>,
}

impl ProjectedSide {
    /// Project a validated table down to key, join string, and out attrs.
    pub fn project(table: &Table, key_idx: usize, join_idx: usize, out_idxs: &[usize]) -> Self {
        let mut keys = Vec::with_capacity(table.len());
        let mut joins = Vec::with_capacity(table.len());
        let mut outs = Vec::with_capacity(table.len());

        for row in table.rows() {
            keys.push(row[key_idx].clone());
            joins.push(row[join_idx].as_str().map(str::to_string));
            outs.push(out_idxs.iter().map(|&i| row[i].clone()).collect());
        }

        ProjectedSide { keys, joins, outs }
    }

    /// Indices of rows whose join value is present, plus their strings.
    ///
    /// The returned index vector maps compacted positions back to original
    /// row positions for output assembly.
    pub fn present_rows(&self) -> (Vec<usize>, Vec<String>) {
        let mut idxs = Vec::with_capacity(self.joins.len());
        let mut strings = Vec::with_capacity(self.joins.len());
        for (i, join) in self.joins.iter().enumerate() {
            if let Some(s) = join {
                idxs.push(i);
                strings.push(s.clone());
            }
        }
        (idxs, strings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comp_op_eval() {
        assert!(CompOp::Le.eval(2, 2));
        assert!(!CompOp::Lt.eval(2, 2));
        assert!(CompOp::Lt.eval(1, 2));
        assert!(CompOp::Eq.eval(2, 2));
        assert!(!CompOp::Eq.eval(1, 2));
    }

    #[test]
    fn test_comp_op_parse() {
        assert_eq!("<=".parse::<CompOp>().unwrap(), CompOp::Le);
        assert_eq!("<".parse::<CompOp>().unwrap(), CompOp::Lt);
        assert_eq!("=".parse::<CompOp>().unwrap(), CompOp::Eq);
        assert!(">=".parse::<CompOp>().is_err());
    }

    #[test]
    fn test_projection_keeps_row_alignment() {
        let mut t = Table::new(vec!["id", "name", "city"]);
        t.push_row(vec![Value::Int(0), Value::from("ada"), Value::from("x")]);
        t.push_row(vec![Value::Int(1), Value::Null, Value::from("y")]);
        t.push_row(vec![Value::Int(2), Value::from("bob"), Value::Null]);

        let side = ProjectedSide::project(&t, 0, 1, &[2]);
        assert_eq!(side.keys.len(), 3);
        assert_eq!(side.joins[0].as_deref(), Some("ada"));
        assert!(side.joins[1].is_none());
        assert_eq!(side.outs[2], vec![Value::Null]);

        let (idxs, strings) = side.present_rows();
        assert_eq!(idxs, vec![0, 2]);
        assert_eq!(strings, vec!["ada".to_string(), "bob".to_string()]);
    }
}
