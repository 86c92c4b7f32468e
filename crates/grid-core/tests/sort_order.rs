//! Sorting mixed cell values is a consistent total order.

use grid_core::compare_values;
use grid_spec::DataType;
use proptest::prelude::*;
use serde_json::{json, Value};
use std::cmp::Ordering;

fn cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        (-1000i64..1000).prop_map(Value::from),
        (-100.0f64..100.0).prop_map(|f| json!(f)),
        (-50i64..50).prop_map(|n| Value::String(n.to_string())),
        "[0-9a-zA-Z]{1,4}".prop_map(Value::String),
        Just(json!("2025-08-30T21:31:37")),
        Just(json!("2024-01-01")),
        any::<bool>().prop_map(Value::Bool),
    ]
}

fn data_type() -> impl Strategy<Value = DataType> {
    prop_oneof![
        Just(DataType::Numeric),
        Just(DataType::Date),
        Just(DataType::Text),
        Just(DataType::Boolean),
    ]
}

proptest! {
    /// Antisymmetric and transitive for every triple.
    #[test]
    fn prop_comparison_is_a_total_order(a in cell(), b in cell(), c in cell(), t in data_type()) {
        let cmp = |x: &Value, y: &Value| compare_values(Some(x), Some(y), t);

        prop_assert_eq!(cmp(&a, &b), cmp(&b, &a).reverse());
        if cmp(&a, &b) != Ordering::Greater && cmp(&b, &c) != Ordering::Greater {
            prop_assert_ne!(cmp(&a, &c), Ordering::Greater);
        }
    }

    /// Sorted output has every adjacent pair in order.
    #[test]
    fn prop_sorted_cells_are_ordered(mut cells in prop::collection::vec(cell(), 0..40), t in data_type()) {
        cells.sort_by(|x, y| compare_values(Some(x), Some(y), t));
        for pair in cells.windows(2) {
            prop_assert_ne!(compare_values(Some(&pair[0]), Some(&pair[1]), t), Ordering::Greater);
        }
    }
}

#[test]
fn numbers_sort_before_unparsable_text() {
    let mut cells = vec![json!("1x"), json!(10), json!(2), Value::Null, json!("abc")];
    cells.sort_by(|x, y| compare_values(Some(x), Some(y), DataType::Numeric));
    assert_eq!(
        cells,
        vec![Value::Null, json!(2), json!(10), json!("1x"), json!("abc")]
    );
}
