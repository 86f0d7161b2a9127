//! Integration tests for the list contract, exercised through
//! `dyn ListContainer` the way the interpreter's operators use it.

use proptest::prelude::*;

use treelang_runtime::{AssocList, IndexedList, ListContainer, ListError, ListRange, Value};

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-3i32..4).prop_map(Value::from),
        "[a-d]".prop_map(Value::text),
    ]
}

// ---------------------------------------------------------------------------
// Associative list
// ---------------------------------------------------------------------------

#[test]
fn assoc_add_existing_key_keeps_value() {
    let mut list: Box<dyn ListContainer> = Box::new(AssocList::new());
    list.set_value(Value::text("k"), Value::from(1), false).unwrap();
    list.add_value(Value::text("k"));
    assert_eq!(list.get_value(&Value::text("k")).unwrap(), &Value::from(1));
}

#[test]
fn assoc_get_missing_is_a_domain_error() {
    let list = AssocList::new();
    assert_eq!(
        list.get_value(&Value::text("nope")),
        Err(ListError::KeyNotFound {
            key: Value::text("nope")
        })
    );
}

#[test]
fn assoc_cut_without_range_empties() {
    let mut list: AssocList = [
        (Value::text("a"), Value::from(1)),
        (Value::text("b"), Value::from(2)),
    ]
    .into_iter()
    .collect();
    list.cut(ListRange::default()).unwrap();
    assert!(list.is_empty());
}

#[test]
fn assoc_ranged_cut_and_copy_are_invalid() {
    let mut list: AssocList = [(Value::text("a"), Value::from(1))].into_iter().collect();

    let err = list.cut(ListRange::new(2, 5)).unwrap_err();
    assert!(matches!(err, ListError::InvalidOperation { .. }));
    assert_eq!(list.len(), 1);

    // A single off-default bound is enough.
    assert!(list.cut(ListRange::new(1, 2)).is_err());
    assert!(list.create_copy(ListRange::new(2, 0)).is_err());
}

#[test]
fn assoc_enumeration_yields_keys_in_insertion_order() {
    let mut list = AssocList::new();
    for key in ["z", "a", "m"] {
        list.set_value(Value::text(key), Value::from(0), false).unwrap();
    }
    let keys: Vec<_> = list.enumerate_values().cloned().collect();
    assert_eq!(keys, vec![Value::text("z"), Value::text("a"), Value::text("m")]);

    // Restartable.
    assert_eq!(list.enumerate_values().count(), 3);
    assert_eq!(list.enumerate_values().count(), 3);
}

// ---------------------------------------------------------------------------
// Indexed list
// ---------------------------------------------------------------------------

#[test]
fn indexed_copy_is_independent_of_source() {
    let mut source: IndexedList = [1, 2, 3].into_iter().map(Value::from).collect();
    let copy = source.create_copy(ListRange::default()).unwrap();

    source.add_value(Value::from(4));
    source.set_value(Value::from(1), Value::text("changed"), false).unwrap();
    source.cut(ListRange::new(2, 3)).unwrap();

    assert_eq!(
        copy.copy_to_array(),
        vec![Value::from(1), Value::from(2), Value::from(3)]
    );
}

#[test]
fn indexed_cut_out_of_range_leaves_list_intact() {
    let mut list: IndexedList = [1, 2].into_iter().map(Value::from).collect();
    assert!(matches!(
        list.cut(ListRange::new(1, 7)),
        Err(ListError::IndexOutOfRange { index: 7, len: 2 })
    ));
    assert_eq!(list.len(), 2);
}

#[test]
fn signed_zero_and_nan_keys_collapse() {
    let mut list = AssocList::new();
    list.set_value(Value::Num(0.0), Value::text("zero"), false).unwrap();
    list.set_value(Value::Num(-0.0), Value::text("negative zero"), false).unwrap();
    list.set_value(Value::Num(f64::NAN), Value::text("nan"), false).unwrap();
    list.add_value(Value::Num(f64::NAN));

    assert_eq!(list.len(), 2);
    assert_eq!(list.get_value(&Value::Num(0.0)).unwrap(), &Value::text("negative zero"));
    assert_eq!(list.get_value(&Value::Num(f64::NAN)).unwrap(), &Value::text("nan"));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn assoc_contains_agrees_with_default_scan(
        keys in prop::collection::vec(arb_value(), 0..20),
        probe in arb_value(),
    ) {
        let mut list = AssocList::new();
        for key in keys {
            list.add_value(key);
        }
        let scanned = list.enumerate_values().any(|k| *k == probe);
        prop_assert_eq!(list.contains_value(&probe), scanned);
    }

    #[test]
    fn assoc_add_never_changes_existing_association(
        pairs in prop::collection::vec((arb_value(), arb_value()), 1..20),
    ) {
        let mut list = AssocList::new();
        for (key, value) in &pairs {
            list.set_value(key.clone(), value.clone(), false).unwrap();
        }
        let before = list.copy_assoc_values();
        for (key, _) in &pairs {
            list.add_value(key.clone());
        }
        prop_assert_eq!(list.copy_assoc_values(), before);
    }

    #[test]
    fn find_value_points_at_an_equal_element(
        values in prop::collection::vec(arb_value(), 0..20),
        probe in arb_value(),
    ) {
        let list = IndexedList::from_values(values.clone());
        let found = list.find_value(&probe, ListRange::ALL).unwrap();
        match values.iter().position(|v| *v == probe) {
            Some(i) => prop_assert_eq!(found, i + 1),
            None => prop_assert_eq!(found, 0),
        }
    }

    #[test]
    fn indexed_cut_removes_exactly_the_range(
        values in prop::collection::vec(arb_value(), 0..20),
        a in 0usize..21,
        b in 0usize..21,
    ) {
        let len = values.len();
        let (start, end) = (a.min(b).min(len) + 1, a.max(b).min(len) + 1);
        let mut list = IndexedList::from_values(values.clone());
        list.cut(ListRange::new(start as i64, end as i64)).unwrap();

        let mut expected = values;
        expected.drain(start - 1..end - 1);
        prop_assert_eq!(list.copy_to_array(), expected);
    }
}
