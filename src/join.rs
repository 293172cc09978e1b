// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The edit-distance join, end to end.
//!
//! Pipeline: validate, project both tables down to key/join/out cells, drop
//! rows with missing join values, build the frequency token ordering over
//! both sides, turn every retained string into an ordered token vector,
//! build the prefix index over the left vectors, run the partitioned
//! candidate pipeline, and materialize the output table.
//!
//! The join is approximate by construction: a pair of strings that share no
//! q-gram at all generates no candidate and is never verified, whatever its
//! true distance. Strings shorter than q have no q-grams and therefore
//! never appear in the output. Callers needing those pairs must handle them
//! separately.

use log::debug;

use crate::driver::{self, JoinShared, TaskOutput};
use crate::error::JoinError;
use crate::index::PrefixIndex;
use crate::missing::missing_value_pairs;
use crate::ordering::TokenOrdering;
use crate::table::{Table, Value};
use crate::tokenize::{MultisetGuard, Tokenizer};
use crate::types::{JoinOptions, ProjectedSide, TokenId};
use crate::validate::{
    resolve_out_attrs, validate_attr, validate_input_table, validate_join_attr_type,
    validate_key_attr, validate_threshold, validate_tokenizer,
};

/// Join two tables on string columns under an edit-distance constraint.
///
/// Returns every row pair whose join strings satisfy
/// `levenshtein(left, right) comp_op floor(threshold)`, as a table with
/// columns `_id, l_<key>, r_<key>, l_<out attrs>, r_<out attrs>,
/// [_sim_score]`. Output ordering is unspecified.
///
/// The tokenizer is forced into multiset mode for the duration of the call
/// and restored afterwards, error paths included.
#[allow(clippy::too_many_arguments)]
pub fn edit_distance_join<T: Tokenizer + ?Sized>(
    ltable: &Table,
    rtable: &Table,
    l_key_attr: &str,
    r_key_attr: &str,
    l_join_attr: &str,
    r_join_attr: &str,
    threshold: f64,
    tokenizer: &mut T,
    options: &JoinOptions,
) -> Result<Table, JoinError> {
    validate_input_table(ltable, "left table")?;
    validate_input_table(rtable, "right table")?;

    let l_key_idx = validate_attr(l_key_attr, ltable, "key attribute", "left table")?;
    let r_key_idx = validate_attr(r_key_attr, rtable, "key attribute", "right table")?;
    let l_join_idx = validate_attr(l_join_attr, ltable, "join attribute", "left table")?;
    let r_join_idx = validate_attr(r_join_attr, rtable, "join attribute", "right table")?;

    validate_join_attr_type(ltable, l_join_idx, l_join_attr, "left table")?;
    validate_join_attr_type(rtable, r_join_idx, r_join_attr, "right table")?;

    let (l_out_names, l_out_idxs) =
        resolve_out_attrs(options.l_out_attrs.as_deref(), l_key_attr, ltable, "left table")?;
    let (r_out_names, r_out_idxs) =
        resolve_out_attrs(options.r_out_attrs.as_deref(), r_key_attr, rtable, "right table")?;

    validate_key_attr(ltable, l_key_idx, l_key_attr, "left table")?;
    validate_key_attr(rtable, r_key_idx, r_key_attr, "right table")?;
    validate_threshold(threshold)?;
    validate_tokenizer(tokenizer)?;

    let tau = threshold.floor() as usize;
    let qval = tokenizer.qval();

    let l_side = ProjectedSide::project(ltable, l_key_idx, l_join_idx, &l_out_idxs);
    let r_side = ProjectedSide::project(rtable, r_key_idx, r_join_idx, &r_out_idxs);
    let (l_present, l_strings) = l_side.present_rows();
    let (r_present, r_strings) = r_side.present_rows();

    let result = {
        // Multiset mode for the whole tokenizing phase; the guard restores
        // the caller's setting when it drops.
        let guard = MultisetGuard::new(tokenizer);
        let tok = guard.tokenizer();

        let ordering = TokenOrdering::build(tok, &l_strings, &r_strings);
        debug!(
            "token ordering built over {} distinct q-grams (q={})",
            ordering.len(),
            qval
        );

        let l_vectors: Vec<Vec<TokenId>> = l_strings
            .iter()
            .map(|s| ordering.ordered_ids(tok, s))
            .collect();
        let r_vectors: Vec<Vec<TokenId>> = r_strings
            .iter()
            .map(|s| ordering.ordered_ids(tok, s))
            .collect();

        let index = PrefixIndex::build(&l_vectors, qval, tau);
        debug!(
            "prefix index: {} rows, {} posting lists, {} postings",
            index.num_rows(),
            index.num_posting_lists(),
            index.num_postings()
        );

        let shared = JoinShared {
            index: &index,
            left_strings: &l_strings,
            right_strings: &r_strings,
            right_vectors: &r_vectors,
            qval,
            tau,
            comp_op: options.comp_op,
        };
        driver::run(&shared, driver::resolve_n_jobs(options.n_jobs))
    };
    debug!("join produced {} pairs", result.pairs.len());

    let header = output_header(
        l_key_attr,
        r_key_attr,
        &l_out_names,
        &r_out_names,
        &options.l_out_prefix,
        &options.r_out_prefix,
        options.out_sim_score,
    );
    Ok(materialize(
        &l_side,
        &r_side,
        &l_present,
        &r_present,
        &result,
        header,
        options.allow_missing,
        options.out_sim_score,
    ))
}

/// Output column names: `_id`, prefixed keys, prefixed out attrs, and the
/// score column when requested.
pub(crate) fn output_header(
    l_key_attr: &str,
    r_key_attr: &str,
    l_out_names: &[String],
    r_out_names: &[String],
    l_prefix: &str,
    r_prefix: &str,
    with_score: bool,
) -> Vec<String> {
    let mut header = Vec::with_capacity(4 + l_out_names.len() + r_out_names.len());
    header.push("_id".to_string());
    header.push(format!("{}{}", l_prefix, l_key_attr));
    header.push(format!("{}{}", r_prefix, r_key_attr));
    header.extend(l_out_names.iter().map(|a| format!("{}{}", l_prefix, a)));
    header.extend(r_out_names.iter().map(|a| format!("{}{}", r_prefix, a)));
    if with_score {
        header.push("_sim_score".to_string());
    }
    header
}

/// Turn emitted pairs into the output table, appending missing-value pairs
/// and the leading `_id` column.
///
/// `pairs` indexes the compacted (join-value-present) rows; `l_present` and
/// `r_present` map those back to original row positions.
#[allow(clippy::too_many_arguments)]
pub(crate) fn materialize(
    l_side: &ProjectedSide,
    r_side: &ProjectedSide,
    l_present: &[usize],
    r_present: &[usize],
    result: &TaskOutput,
    header: Vec<String>,
    allow_missing: bool,
    with_score: bool,
) -> Table {
    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(result.pairs.len());

    for (k, &(lc, rc)) in result.pairs.iter().enumerate() {
        let li = l_present[lc as usize];
        let ri = r_present[rc as usize];

        let mut row =
            Vec::with_capacity(2 + l_side.outs[li].len() + r_side.outs[ri].len() + 1);
        row.push(l_side.keys[li].clone());
        row.push(r_side.keys[ri].clone());
        row.extend(l_side.outs[li].iter().cloned());
        row.extend(r_side.outs[ri].iter().cloned());
        if with_score {
            row.push(Value::Int(result.scores[k] as i64));
        }
        rows.push(row);
    }

    if allow_missing {
        rows.extend(missing_value_pairs(l_side, r_side, with_score));
    }

    let mut table = Table::new(header);
    for (id, row) in rows.into_iter().enumerate() {
        let mut full = Vec::with_capacity(row.len() + 1);
        full.push(Value::Int(id as i64));
        full.extend(row);
        table.push_row(full);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::QgramTokenizer;

    fn name_table(names: &[&str]) -> Table {
        let mut t = Table::new(vec!["id", "name"]);
        for (i, name) in names.iter().enumerate() {
            t.push_row(vec![Value::Int(i as i64), Value::from(*name)]);
        }
        t
    }

    #[test]
    fn test_single_substitution_pair() {
        let l = name_table(&["cat"]);
        let r = name_table(&["bat"]);
        let mut tok = QgramTokenizer::new(2);
        let out = edit_distance_join(
            &l,
            &r,
            "id",
            "id",
            "name",
            "name",
            1.0,
            &mut tok,
            &JoinOptions::default(),
        )
        .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(
            out.columns(),
            &["_id", "l_id", "r_id", "_sim_score"]
        );
        assert_eq!(
            out.rows()[0],
            vec![Value::Int(0), Value::Int(0), Value::Int(0), Value::Int(1)]
        );
    }

    #[test]
    fn test_validation_runs_before_tokenization() {
        let l = name_table(&["cat"]);
        let r = name_table(&["bat"]);
        let mut tok = QgramTokenizer::new(2);
        let err = edit_distance_join(
            &l,
            &r,
            "id",
            "id",
            "name",
            "name",
            -3.0,
            &mut tok,
            &JoinOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, JoinError::InvalidThreshold(_)));
    }

    #[test]
    fn test_threshold_is_floored() {
        let l = name_table(&["cat"]);
        let r = name_table(&["bat"]);
        let mut tok = QgramTokenizer::new(2);
        // floor(1.9) = 1, so the distance-1 pair still qualifies.
        let out = edit_distance_join(
            &l,
            &r,
            "id",
            "id",
            "name",
            "name",
            1.9,
            &mut tok,
            &JoinOptions::default(),
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out.rows()[0][3], Value::Int(1));
    }
}
