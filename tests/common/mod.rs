//! Shared test utilities and fixtures.

#![allow(dead_code)]

use simjoin::{Table, Value};

/// Build a two-column `(id, name)` table from row-index keys.
pub fn name_table(names: &[&str]) -> Table {
    let mut table = Table::new(vec!["id", "name"]);
    for (i, name) in names.iter().enumerate() {
        table.push_row(vec![Value::Int(i as i64), Value::from(*name)]);
    }
    table
}

/// Like [`name_table`], but `None` becomes a null join cell.
pub fn name_table_opt(names: &[Option<&str>]) -> Table {
    let mut table = Table::new(vec!["id", "name"]);
    for (i, name) in names.iter().enumerate() {
        let cell = match name {
            Some(s) => Value::from(*s),
            None => Value::Null,
        };
        table.push_row(vec![Value::Int(i as i64), cell]);
    }
    table
}

/// Extract `(l_key, r_key, score)` triples from a join output table,
/// sorted, ignoring the `_id` column. `score` is `None` when the table has
/// no `_sim_score` column or the cell is null.
pub fn pair_set(output: &Table) -> Vec<(i64, i64, Option<i64>)> {
    let has_score = output.columns().last().map(String::as_str) == Some("_sim_score");
    let mut pairs: Vec<(i64, i64, Option<i64>)> = output
        .rows()
        .iter()
        .map(|row| {
            let l = match &row[1] {
                Value::Int(v) => *v,
                other => panic!("left key is not an integer: {:?}", other),
            };
            let r = match &row[2] {
                Value::Int(v) => *v,
                other => panic!("right key is not an integer: {:?}", other),
            };
            let score = if has_score {
                match row.last() {
                    Some(Value::Int(d)) => Some(*d),
                    _ => None,
                }
            } else {
                None
            };
            (l, r, score)
        })
        .collect();
    pairs.sort_unstable();
    pairs
}

/// The `_id` column values, in row order.
pub fn id_column(output: &Table) -> Vec<i64> {
    output
        .rows()
        .iter()
        .map(|row| match &row[0] {
            Value::Int(v) => *v,
            other => panic!("_id is not an integer: {:?}", other),
        })
        .collect()
}
