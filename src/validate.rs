// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Input validation for the join entry points.
//!
//! Everything here runs before any tokenization or index construction. The
//! checks mirror the entry-point contract: tables well-formed, named columns
//! present, join columns textual, keys unique and non-null, threshold a
//! finite non-negative number, tokenizer a real q-gram tokenizer.

use crate::error::JoinError;
use crate::table::{Table, Value};
use crate::tokenize::Tokenizer;
use std::collections::HashSet;

/// Reject ragged rows and duplicate column names.
pub(crate) fn validate_input_table(table: &Table, label: &'static str) -> Result<(), JoinError> {
    if table.columns().is_empty() {
        return Err(JoinError::InvalidInputTable {
            table: label,
            reason: "table has no columns".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for column in table.columns() {
        if !seen.insert(column.as_str()) {
            return Err(JoinError::InvalidInputTable {
                table: label,
                reason: format!("duplicate column name {:?}", column),
            });
        }
    }

    let arity = table.columns().len();
    if let Some(pos) = table.rows().iter().position(|row| row.len() != arity) {
        return Err(JoinError::InvalidInputTable {
            table: label,
            reason: format!("row {} has {} cells, expected {}", pos, table.rows()[pos].len(), arity),
        });
    }

    Ok(())
}

/// Resolve a named column, or fail with the attribute's role in the message.
pub(crate) fn validate_attr(
    attr: &str,
    table: &Table,
    attr_label: &'static str,
    table_label: &'static str,
) -> Result<usize, JoinError> {
    table
        .column_index(attr)
        .ok_or_else(|| JoinError::UnknownAttribute {
            attr: attr.to_string(),
            attr_label,
            table: table_label,
        })
}

/// Every non-null cell of a join column must be a string.
pub(crate) fn validate_join_attr_type(
    table: &Table,
    col: usize,
    attr: &str,
    table_label: &'static str,
) -> Result<(), JoinError> {
    for row in table.rows() {
        match &row[col] {
            Value::Str(_) | Value::Null => {}
            _ => {
                return Err(JoinError::NonTextualJoinAttribute {
                    attr: attr.to_string(),
                    table: table_label,
                })
            }
        }
    }
    Ok(())
}

/// Check requested output columns exist and resolve them to positions.
///
/// The key column is dropped from the list when present; it is always
/// emitted on its own and would only duplicate a column.
pub(crate) fn resolve_out_attrs(
    out_attrs: Option<&[String]>,
    key_attr: &str,
    table: &Table,
    table_label: &'static str,
) -> Result<(Vec<String>, Vec<usize>), JoinError> {
    let mut names = Vec::new();
    let mut idxs = Vec::new();
    if let Some(attrs) = out_attrs {
        for attr in attrs {
            let idx = table
                .column_index(attr)
                .ok_or_else(|| JoinError::InvalidOutputAttribute {
                    attr: attr.clone(),
                    table: table_label,
                })?;
            if attr != key_attr {
                names.push(attr.clone());
                idxs.push(idx);
            }
        }
    }
    Ok((names, idxs))
}

/// Key columns must be unique and fully populated.
pub(crate) fn validate_key_attr(
    table: &Table,
    col: usize,
    attr: &str,
    table_label: &'static str,
) -> Result<(), JoinError> {
    let mut seen = HashSet::with_capacity(table.len());
    for row in table.rows() {
        let key = &row[col];
        if key.is_null() || !seen.insert(key) {
            return Err(JoinError::NonUniqueOrMissingKey {
                attr: attr.to_string(),
                table: table_label,
            });
        }
    }
    Ok(())
}

/// The distance bound must be a finite non-negative number.
pub(crate) fn validate_threshold(threshold: f64) -> Result<(), JoinError> {
    if !threshold.is_finite() || threshold < 0.0 {
        return Err(JoinError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// The tokenizer must produce q-grams for some q >= 1.
pub(crate) fn validate_tokenizer<T: Tokenizer + ?Sized>(tokenizer: &T) -> Result<(), JoinError> {
    if tokenizer.qval() == 0 {
        return Err(JoinError::InvalidTokenizer);
    }
    Ok(())
}
