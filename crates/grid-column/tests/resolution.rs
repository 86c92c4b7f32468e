//! Resolution properties over generated models.

use grid_column::{CellValue, ColumnResolver, FilterWidget, Viewport};
use grid_spec::{DataType, FieldKind, FieldSpec, ModelSpec, RowRecord, SelectItem};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn field_strategy() -> impl Strategy<Value = FieldSpec> {
    let kind = prop_oneof![
        Just(FieldSpec::number()),
        Just(FieldSpec::text()),
        Just(FieldSpec::date()),
        Just(FieldSpec::boolean()),
        Just(FieldSpec::multiselect(vec![SelectItem::new("A", "a")])),
        Just(FieldSpec::dropdown("Id", "Name")),
    ];
    (kind, any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(spec, read_only, hidden, frozen)| {
        let spec = if read_only { spec.read_only() } else { spec };
        let spec = if hidden { spec.hidden() } else { spec };
        if frozen {
            spec.frozen()
        } else {
            spec
        }
    })
}

fn model_strategy() -> impl Strategy<Value = ModelSpec> {
    (any::<bool>(), prop::collection::vec(field_strategy(), 0..8)).prop_map(|(key_read_only, fields)| {
        let key = if key_read_only {
            FieldSpec::id().data_key().read_only()
        } else {
            FieldSpec::id().data_key()
        };
        fields
            .into_iter()
            .enumerate()
            .fold(ModelSpec::builder("Generated").field("Key", key), |b, (i, spec)| {
                b.field(format!("Field{i}"), spec)
            })
            .build()
            .unwrap()
    })
}

proptest! {
    #[test]
    fn prop_one_binding_per_field(model in model_strategy(), width in 0u32..2000) {
        let columns = ColumnResolver::default().resolve(&model, Viewport::new(width));
        prop_assert_eq!(columns.len(), model.len());

        for (column, (name, spec)) in columns.iter().zip(model.fields()) {
            prop_assert_eq!(column.field.as_str(), name);
            prop_assert_eq!(column.editor.is_some(), !spec.is_read_only);
            prop_assert_eq!(column.data_type, spec.effective_data_type());
            prop_assert_eq!(column.frozen, spec.frozen && width > 768);
        }
    }

    #[test]
    fn prop_resolution_is_deterministic(model in model_strategy(), width in 0u32..2000) {
        let resolver = ColumnResolver::default();
        prop_assert_eq!(
            resolver.resolve(&model, Viewport::new(width)),
            resolver.resolve(&model, Viewport::new(width))
        );
    }
}

#[test]
fn numeric_classification_for_id_and_number() {
    let model = ModelSpec::builder("Card")
        .field("CardId", FieldSpec::id().data_key())
        .field("Value", FieldSpec::number())
        .field("Flag", FieldSpec::boolean())
        .build()
        .unwrap();
    let types: Vec<_> = ColumnResolver::default()
        .resolve(&model, Viewport::default())
        .into_iter()
        .map(|c| c.data_type)
        .collect();
    assert_eq!(types, vec![DataType::Numeric, DataType::Numeric, DataType::Boolean]);
}

#[test]
fn renders_a_card_row() {
    let model = ModelSpec::builder("Card")
        .field("CardId", FieldSpec::id().data_key().read_only())
        .field("Value", FieldSpec::number().with_decimal_places(2))
        .field("DisplayName", FieldSpec::text().display_name())
        .field("Active", FieldSpec::boolean())
        .field("ModifiedAt", FieldSpec::date().read_only())
        .build()
        .unwrap();
    let row = RowRecord::new()
        .with("CardId", 3)
        .with("Value", 1250)
        .with("DisplayName", "Large")
        .with("Active", true)
        .with("ModifiedAt", "2025-08-30T21:31:37");

    let cells: Vec<String> = ColumnResolver::default()
        .resolve(&model, Viewport::new(1024))
        .iter()
        .map(|c| c.format(&row).to_string())
        .collect();

    assert_eq!(
        cells,
        vec!["3", "1,250.00", "Large", "Y", "Aug 30, 2025 9:31 PM"]
    );
}

#[test]
fn column_filters_feed_the_shared_cache() {
    let model = ModelSpec::builder("Card")
        .field("CardId", FieldSpec::id().data_key())
        .field("Value", FieldSpec::number())
        .build()
        .unwrap();
    let cache = grid_filter::SharedFilterCache::new(&model);
    let columns = ColumnResolver::default().resolve(&model, Viewport::default());
    let value = columns.iter().find(|c| c.field == "Value").unwrap();
    assert_eq!(value.filter, FilterWidget::NumericRange);

    let handle = value.bind_filter(&cache).unwrap();
    handle.set_draft(value.parse_filter(None, "5..8").unwrap()).unwrap();
    let applied = handle.apply().unwrap();

    assert!(applied.matches(&RowRecord::new().with("CardId", 1).with("Value", 5)));
    assert!(!applied.matches(&RowRecord::new().with("CardId", 2).with("Value", 13)));
}

#[test]
fn multiselect_cells_are_blank_and_not_editable() {
    let spec = FieldSpec::multiselect(vec![SelectItem::new("Admin", "admin")]);
    let column = ColumnResolver::default().resolve_field("Roles", &spec, Viewport::default());
    assert_eq!(column.kind, FieldKind::Multiselect);
    assert_eq!(
        column.format(&RowRecord::new().with("Roles", json!(["admin"]))),
        CellValue::Text(String::new())
    );
    assert!(!column.editor.unwrap().renders_input());
}
