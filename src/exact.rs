// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Attribute-equivalence join.
//!
//! The degenerate sibling of the edit-distance join: pairs qualify when
//! their join strings are byte-identical. A hash index over the left
//! strings replaces the prefix index, probing is a single map lookup, and
//! there is no verification step and no score column. Validation, missing
//! value handling, partitioning, and output shape are shared with the
//! edit-distance path.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use log::debug;
use std::collections::HashMap;
use std::ops::Range;

use crate::driver::{partition_ranges, resolve_n_jobs, TaskOutput};
use crate::error::JoinError;
use crate::join::{materialize, output_header};
use crate::table::Table;
use crate::types::{JoinOptions, ProjectedSide};
use crate::validate::{
    resolve_out_attrs, validate_attr, validate_input_table, validate_join_attr_type,
    validate_key_attr,
};

/// Hash index from join string to the left rows carrying it.
#[derive(Debug, Default)]
struct HashIndex<'a> {
    index: HashMap<&'a str, Vec<u32>>,
}

impl<'a> HashIndex<'a> {
    fn build(strings: &'a [String]) -> Self {
        let mut index: HashMap<&str, Vec<u32>> = HashMap::new();
        for (row, s) in strings.iter().enumerate() {
            index.entry(s.as_str()).or_default().push(row as u32);
        }
        HashIndex { index }
    }

    fn probe(&self, s: &str) -> &[u32] {
        self.index.get(s).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Join two tables on string equality of the join columns.
///
/// Output columns are `_id, l_<key>, r_<key>, l_<out attrs>, r_<out attrs>`;
/// the `out_sim_score` option does not apply. Output ordering is
/// unspecified.
pub fn exact_join(
    ltable: &Table,
    rtable: &Table,
    l_key_attr: &str,
    r_key_attr: &str,
    l_join_attr: &str,
    r_join_attr: &str,
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

    let l_side = ProjectedSide::project(ltable, l_key_idx, l_join_idx, &l_out_idxs);
    let r_side = ProjectedSide::project(rtable, r_key_idx, r_join_idx, &r_out_idxs);
    let (l_present, l_strings) = l_side.present_rows();
    let (r_present, r_strings) = r_side.present_rows();

    let index = HashIndex::build(&l_strings);
    debug!(
        "hash index: {} rows, {} distinct join strings",
        l_strings.len(),
        index.index.len()
    );

    let num_rows = r_strings.len();
    let n = resolve_n_jobs(options.n_jobs).clamp(1, num_rows.max(1));
    let result = if n <= 1 || num_rows == 0 {
        probe_range(&index, &r_strings, 0..num_rows)
    } else {
        let outputs = probe_partitions(&index, &r_strings, partition_ranges(num_rows, n));
        let mut merged = TaskOutput::default();
        for out in outputs {
            merged.pairs.extend(out.pairs);
        }
        merged
    };
    debug!("exact join produced {} pairs", result.pairs.len());

    let header = output_header(
        l_key_attr,
        r_key_attr,
        &l_out_names,
        &r_out_names,
        &options.l_out_prefix,
        &options.r_out_prefix,
        false,
    );
    Ok(materialize(
        &l_side,
        &r_side,
        &l_present,
        &r_present,
        &result,
        header,
        options.allow_missing,
        false,
    ))
}

fn probe_range(index: &HashIndex<'_>, right: &[String], range: Range<usize>) -> TaskOutput {
    let mut out = TaskOutput::default();
    for r in range {
        for &l in index.probe(&right[r]) {
            out.pairs.push((l, r as u32));
        }
    }
    out
}

#[cfg(feature = "parallel")]
fn probe_partitions(
    index: &HashIndex<'_>,
    right: &[String],
    ranges: Vec<Range<usize>>,
) -> Vec<TaskOutput> {
    ranges
        .into_par_iter()
        .map(|range| probe_range(index, right, range))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn probe_partitions(
    index: &HashIndex<'_>,
    right: &[String],
    ranges: Vec<Range<usize>>,
) -> Vec<TaskOutput> {
    ranges
        .into_iter()
        .map(|range| probe_range(index, right, range))
        .collect()
}
