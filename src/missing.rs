// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Missing-value pair enumeration.
//!
//! With `allow_missing` on, a row that cannot participate in the join
//! because its join value is null is instead paired with every row of the
//! other side. Left-missing rows pair with all right rows; right-missing
//! rows pair with only the left rows whose join value is present, so the
//! (missing, missing) combinations are produced exactly once.
//!
//! These pairs carry no distance. When the caller asked for a score column
//! the cell is null.

use crate::table::Value;
use crate::types::ProjectedSide;

/// Cross-produce rows with missing join values against the other side.
///
/// Returns output rows shaped like the core join's rows (key, key, out
/// attrs, optional null score), ready for concatenation.
pub(crate) fn missing_value_pairs(
    left: &ProjectedSide,
    right: &ProjectedSide,
    with_score: bool,
) -> Vec<Vec<Value>> {
    let mut rows = Vec::new();

    for (li, join) in left.joins.iter().enumerate() {
        if join.is_some() {
            continue;
        }
        for ri in 0..right.keys.len() {
            rows.push(output_row(left, right, li, ri, with_score));
        }
    }

    for (ri, join) in right.joins.iter().enumerate() {
        if join.is_some() {
            continue;
        }
        for (li, join) in left.joins.iter().enumerate() {
            if join.is_none() {
                continue;
            }
            rows.push(output_row(left, right, li, ri, with_score));
        }
    }

    rows
}

fn output_row(
    left: &ProjectedSide,
    right: &ProjectedSide,
    li: usize,
    ri: usize,
    with_score: bool,
) -> Vec<Value> {
    let mut row = Vec::with_capacity(2 + left.outs[li].len() + right.outs[ri].len() + 1);
    row.push(left.keys[li].clone());
    row.push(right.keys[ri].clone());
    row.extend(left.outs[li].iter().cloned());
    row.extend(right.outs[ri].iter().cloned());
    if with_score {
        row.push(Value::Null);
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    fn side(joins: &[Option<&str>]) -> ProjectedSide {
        let mut t = Table::new(vec!["id", "s"]);
        for (i, j) in joins.iter().enumerate() {
            let cell = match j {
                Some(s) => Value::from(*s),
                None => Value::Null,
            };
            t.push_row(vec![Value::Int(i as i64), cell]);
        }
        ProjectedSide::project(&t, 0, 1, &[])
    }

    #[test]
    fn test_each_missing_pair_once() {
        let left = side(&[Some("a"), None]);
        let right = side(&[None, Some("b")]);
        let rows = missing_value_pairs(&left, &right, false);

        // Left row 1 pairs with both right rows; right row 0 pairs with
        // left row 0 only (left row 1 was already covered).
        let mut pairs: Vec<(i64, i64)> = rows
            .iter()
            .map(|r| match (&r[0], &r[1]) {
                (Value::Int(l), Value::Int(rr)) => (*l, *rr),
                _ => panic!("non-integer key"),
            })
            .collect();
        pairs.sort_unstable();
        assert_eq!(pairs, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_score_cell_is_null() {
        let left = side(&[None]);
        let right = side(&[Some("b")]);
        let rows = missing_value_pairs(&left, &right, true);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 3);
        assert!(rows[0][2].is_null());
    }

    #[test]
    fn test_no_missing_rows_no_pairs() {
        let left = side(&[Some("a")]);
        let right = side(&[Some("b")]);
        assert!(missing_value_pairs(&left, &right, false).is_empty());
    }
}
