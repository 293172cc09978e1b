//! Differential properties: the filtered engine against brute force.

use proptest::prelude::*;

use super::common::{name_table, pair_set};
use super::oracles::{oracle_edit_distance_join, oracle_levenshtein};
use simjoin::{
    edit_distance_bounded, edit_distance_join, CompOp, JoinOptions, QgramTokenizer,
};

fn comp_ops() -> impl Strategy<Value = CompOp> {
    prop_oneof![Just(CompOp::Le), Just(CompOp::Lt), Just(CompOp::Eq)]
}

/// Low-entropy strings so q-gram collisions actually happen. Length 1
/// strings are included on purpose: they have no bigrams and must vanish.
fn corpus() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[abcd]{1,9}", 1..12)
}

fn run_join(
    left: &[String],
    right: &[String],
    tau: usize,
    comp_op: CompOp,
    n_jobs: i32,
) -> Vec<(i64, i64, Option<i64>)> {
    let l = name_table(&left.iter().map(String::as_str).collect::<Vec<_>>());
    let r = name_table(&right.iter().map(String::as_str).collect::<Vec<_>>());
    let mut tokenizer = QgramTokenizer::new(2);
    let options = JoinOptions {
        comp_op,
        n_jobs,
        ..JoinOptions::default()
    };
    let out = edit_distance_join(
        &l, &r, "id", "id", "name", "name", tau as f64, &mut tokenizer, &options,
    )
    .expect("validated inputs");
    pair_set(&out)
}

proptest! {
    /// The engine emits exactly the brute-force pairs that share a q-gram,
    /// with exact distances, for every operator.
    #[test]
    fn join_matches_brute_force(
        left in corpus(),
        right in corpus(),
        tau in 0usize..4,
        comp_op in comp_ops(),
    ) {
        let expected = oracle_edit_distance_join(&left, &right, tau, comp_op, 2);
        let actual = run_join(&left, &right, tau, comp_op, 1);
        prop_assert_eq!(actual, expected);
    }

    /// Partitioning the right side must not change the result.
    #[test]
    fn join_is_independent_of_n_jobs(
        left in corpus(),
        right in corpus(),
        tau in 0usize..3,
        n_jobs in prop_oneof![Just(2), Just(3), Just(5), Just(-1)],
    ) {
        let sequential = run_join(&left, &right, tau, CompOp::Le, 1);
        let parallel = run_join(&left, &right, tau, CompOp::Le, n_jobs);
        prop_assert_eq!(sequential, parallel);
    }

    /// Two runs over the same input produce identical output.
    #[test]
    fn join_is_deterministic(
        left in corpus(),
        right in corpus(),
        tau in 0usize..3,
    ) {
        let first = run_join(&left, &right, tau, CompOp::Le, 1);
        let second = run_join(&left, &right, tau, CompOp::Le, 1);
        prop_assert_eq!(first, second);
    }

    /// The bounded kernel agrees with the unbounded oracle at or below the
    /// bound and overshoots above it.
    #[test]
    fn bounded_kernel_matches_oracle(
        a in "[abcd]{0,12}",
        b in "[abcd]{0,12}",
        max in 0usize..5,
    ) {
        let exact = oracle_levenshtein(a.as_bytes(), b.as_bytes());
        let bounded = edit_distance_bounded(a.as_bytes(), b.as_bytes(), max);
        if exact <= max {
            prop_assert_eq!(bounded, exact);
        } else {
            prop_assert!(bounded > max);
        }
    }

    /// Every emitted score is the true edit distance.
    #[test]
    fn scores_are_exact_distances(
        left in corpus(),
        right in corpus(),
        tau in 0usize..4,
    ) {
        for (l, r, score) in run_join(&left, &right, tau, CompOp::Le, 1) {
            let expected =
                oracle_levenshtein(left[l as usize].as_bytes(), right[r as usize].as_bytes());
            prop_assert_eq!(score, Some(expected as i64));
        }
    }
}
