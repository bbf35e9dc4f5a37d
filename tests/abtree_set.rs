use std::collections::BTreeSet;

use abtree::{ABTreeSet, Params};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

/// Generates values in a range that ensures collisions.
fn value_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

fn params_strategy() -> impl Strategy<Value = Params> {
    prop_oneof![
        Just(Params::new(2, 3).unwrap()),
        Just(Params::new(2, 4).unwrap()),
        Just(Params::new(3, 5).unwrap()),
        Just(Params::new(4, 100).unwrap()),
        (2usize..16, 0usize..16).prop_map(|(a, extra)| Params::new(a, 2 * a - 1 + extra).unwrap()),
    ]
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum SetOp {
    Insert(i64),
    Remove(i64),
    Take(i64),
    Contains(i64),
    First,
    Last,
    PopFirst,
    PopLast,
}

fn set_op_strategy() -> impl Strategy<Value = SetOp> {
    prop_oneof![
        5 => value_strategy().prop_map(SetOp::Insert),
        3 => value_strategy().prop_map(SetOp::Remove),
        1 => value_strategy().prop_map(SetOp::Take),
        2 => value_strategy().prop_map(SetOp::Contains),
        1 => Just(SetOp::First),
        1 => Just(SetOp::Last),
        1 => Just(SetOp::PopFirst),
        1 => Just(SetOp::PopLast),
    ]
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

fn ascending_then_descending_removal(a: usize, b: usize) {
    let mut set = ABTreeSet::new(a, b);
    for i in 0..1000 {
        assert!(set.insert(i));
    }
    for i in 0..1000 {
        assert!(set.contains(&i), "({a},{b}) missing {i} after ascending inserts");
    }
    assert_eq!(set.validate(), Ok(()));

    for i in (0..1000).rev() {
        assert!(set.remove(&i));
    }
    for i in 0..1000 {
        assert!(!set.contains(&i), "({a},{b}) still holds {i} after removal");
    }
    assert_eq!(set.len(), 0);
    assert_eq!(set.height(), 1);
    assert_eq!(set.validate(), Ok(()));
}

fn descending_inserts_membership(a: usize, b: usize) -> Vec<bool> {
    let mut set = ABTreeSet::new(a, b);
    for i in (-499..=500).rev() {
        set.insert(i);
    }
    assert_eq!(set.len(), 1000);
    assert_eq!(set.validate(), Ok(()));

    let found: Vec<bool> = (-1000..1000).map(|i| set.contains(&i)).collect();
    let expected: Vec<bool> = (-1000..1000).map(|i| i <= 500 && i > -500).collect();
    assert_eq!(found, expected);
    found
}

#[test]
fn two_four_tree_round_trip() {
    ascending_then_descending_removal(2, 4);
}

#[test]
fn four_hundred_tree_round_trip() {
    ascending_then_descending_removal(4, 100);
}

#[test]
fn descending_inserts_match_across_branching_factors() {
    let narrow = descending_inserts_membership(2, 4);
    let wide = descending_inserts_membership(4, 100);
    assert_eq!(narrow, wide);
}

#[test]
fn single_key_round_trip_restores_empty_tree() {
    for (a, b) in [(2, 4), (4, 100)] {
        let mut set = ABTreeSet::new(a, b);
        assert!(set.insert(7));
        assert!(set.remove(&7));
        assert!(set.is_empty());
        assert_eq!(set.height(), 1);
        assert_eq!(set.first(), None);
        assert_eq!(set.validate(), Ok(()));
    }
}

#[test]
fn missing_remove_is_a_no_op() {
    let mut set: ABTreeSet<i32> = (0..100).step_by(2).collect();
    let len = set.len();
    for odd in (1..100).step_by(2) {
        assert!(!set.remove(&odd));
        assert_eq!(set.take(&odd), None);
    }
    assert_eq!(set.len(), len);
    assert!((0..100).step_by(2).all(|even| set.contains(&even)));
    assert_eq!(set.validate(), Ok(()));
}

#[test]
fn duplicate_insert_keeps_the_stored_key() {
    #[derive(Debug)]
    struct Tagged(u32, &'static str);
    impl PartialEq for Tagged {
        fn eq(&self, other: &Self) -> bool {
            self.0 == other.0
        }
    }
    impl Eq for Tagged {}
    impl PartialOrd for Tagged {
        fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for Tagged {
        fn cmp(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp(&other.0)
        }
    }

    let mut set = ABTreeSet::new(2, 4);
    assert!(set.insert(Tagged(1, "first")));
    assert!(!set.insert(Tagged(1, "second")));
    assert_eq!(set.len(), 1);
    assert_eq!(set.get(&Tagged(1, "")).map(|t| t.1), Some("first"));
}

#[test]
fn borrowed_lookups() {
    let mut set: ABTreeSet<String> = ABTreeSet::new(3, 8);
    for word in ["pear", "apple", "fig", "quince", "banana", "cherry", "date", "elder"] {
        set.insert(word.to_owned());
    }
    assert!(set.contains("fig"));
    assert_eq!(set.get("date").map(String::as_str), Some("date"));
    assert!(set.remove("apple"));
    assert_eq!(set.first().map(String::as_str), Some("banana"));
    assert_eq!(set.last().map(String::as_str), Some("quince"));
}

#[test]
fn invalid_parameters_are_rejected() {
    assert!(ABTreeSet::<u8>::try_new(1, 10).is_err());
    assert!(ABTreeSet::<u8>::try_new(5, 8).is_err());
    assert!(ABTreeSet::<u8>::try_new(5, 9).is_ok());
}

// ─── Randomized model tests ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both ABTreeSet and BTreeSet and asserts
    /// identical results at every step.
    #[test]
    fn set_ops_match_btreeset(
        params in params_strategy(),
        ops in proptest::collection::vec(set_op_strategy(), TEST_SIZE),
    ) {
        let mut ab_set: ABTreeSet<i64> = ABTreeSet::with_params(params);
        let mut bt_set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                SetOp::Insert(v) => prop_assert_eq!(ab_set.insert(*v), bt_set.insert(*v), "insert({})", v),
                SetOp::Remove(v) => prop_assert_eq!(ab_set.remove(v), bt_set.remove(v), "remove({})", v),
                SetOp::Take(v) => prop_assert_eq!(ab_set.take(v), bt_set.take(v), "take({})", v),
                SetOp::Contains(v) => prop_assert_eq!(ab_set.contains(v), bt_set.contains(v), "contains({})", v),
                SetOp::First => prop_assert_eq!(ab_set.first(), bt_set.first(), "first()"),
                SetOp::Last => prop_assert_eq!(ab_set.last(), bt_set.last(), "last()"),
                SetOp::PopFirst => prop_assert_eq!(ab_set.pop_first(), bt_set.pop_first(), "pop_first()"),
                SetOp::PopLast => prop_assert_eq!(ab_set.pop_last(), bt_set.pop_last(), "pop_last()"),
            }
            prop_assert_eq!(ab_set.len(), bt_set.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(ab_set.is_empty(), bt_set.is_empty(), "is_empty mismatch after {:?}", op);
        }
        prop_assert_eq!(ab_set.validate(), Ok(()));
    }

    /// Inserting a set of distinct keys makes exactly those keys findable.
    #[test]
    fn round_trip_membership(
        params in params_strategy(),
        values in proptest::collection::btree_set(value_strategy(), 0..1_000),
    ) {
        let mut set = ABTreeSet::with_params(params);
        for &v in &values {
            prop_assert!(set.insert(v));
        }
        for probe in -2_100i64..2_100 {
            prop_assert_eq!(set.contains(&probe), values.contains(&probe));
        }
    }

    /// Removing m of n distinct keys leaves n - m.
    #[test]
    fn cardinality_after_removals(
        params in params_strategy(),
        values in proptest::collection::btree_set(value_strategy(), 1..1_000),
        keep_every in 1usize..5,
    ) {
        let mut set: ABTreeSet<i64> = ABTreeSet::with_params(params);
        set.extend(values.iter());

        let mut removed = 0;
        for (i, v) in values.iter().enumerate() {
            if i % keep_every != 0 {
                prop_assert!(set.remove(v));
                removed += 1;
            }
        }
        prop_assert_eq!(set.len(), values.len() - removed);
        prop_assert_eq!(set.validate(), Ok(()));
    }
}
