//! In-process gateway
//!
//! Keeps one ordered record list per resource. New records (unset key) get
//! the next integer key, or a ULID string for string-keyed resources;
//! replacing an unknown key stores the record as sent.

use crate::error::GatewayError;
use crate::gateway::{is_new_key, Gateway};
use dashmap::DashMap;
use grid_spec::{keys_equal, value_text, FieldKind, ModelSpec, RowRecord};
use serde_json::{json, Value};
use ulid::Ulid;

/// Gateway that stores records in memory
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tables: DashMap<String, Vec<RowRecord>>,
}

impl MemoryGateway {
    /// Empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store preloaded with `records` for `resource`
    #[must_use]
    pub fn with_records(self, resource: impl Into<String>, records: Vec<RowRecord>) -> Self {
        self.seed(resource, records);
        self
    }

    /// Replace the records of a resource
    pub fn seed(&self, resource: impl Into<String>, records: Vec<RowRecord>) {
        self.tables.insert(resource.into(), records);
    }

    /// Snapshot of a resource's records
    #[must_use]
    pub fn records(&self, resource: &str) -> Vec<RowRecord> {
        self.tables
            .get(resource)
            .map(|rows| rows.value().clone())
            .unwrap_or_default()
    }

    /// Store seeded with sample card sets, cards and poker rooms
    #[must_use]
    pub fn demo() -> Self {
        let audit = |row: RowRecord| {
            row.with("CreatedAt", "2025-08-30T21:31:37")
                .with("CreatedBy", "seed")
                .with("ModifiedAt", "2025-08-30T21:31:37")
                .with("ModifiedBy", "seed")
        };

        let card_sets = vec![
            audit(RowRecord::new().with("CardSetId", 1).with("Name", "Fibonacci")),
            audit(RowRecord::new().with("CardSetId", 2).with("Name", "T-Shirt")),
        ];

        let fibonacci = [0, 1, 2, 3, 5, 8, 13, 21];
        let shirts = ["XS", "S", "M", "L", "XL"];
        let cards = fibonacci
            .iter()
            .map(|&v| (1, json!(v), v.to_string()))
            .chain(
                shirts
                    .iter()
                    .zip(1..)
                    .map(|(&size, rank)| (2, json!(rank), size.to_string())),
            )
            .zip(1..)
            .map(|((set, value, name), id)| {
                audit(
                    RowRecord::new()
                        .with("CardId", id)
                        .with("CardSetId", set)
                        .with("Value", value)
                        .with("DisplayName", name),
                )
            })
            .collect();

        let rooms = vec![audit(
            RowRecord::new()
                .with("PokerRoomId", "b1f5c6a0-5d1e-4a38-9c7e-0f6c1b7e2a11")
                .with("Name", "Sprint Planning")
                .with("CardSetId", 1)
                .with(
                    "PokerPlayers",
                    json!([
                        {"PokerPlayerId": 1, "DisplayName": "Ada"},
                        {"PokerPlayerId": 2, "DisplayName": "Grace"},
                    ]),
                ),
        )];

        Self::new()
            .with_records("CardSet", card_sets)
            .with_records("Card", cards)
            .with_records("PokerRoom", rooms)
    }
}

/// Key for a new record
///
/// Integer `max + 1` while the key field is `id`/`number` and every stored
/// key is an integer; otherwise a fresh ULID string, as for GUID-keyed
/// resources.
fn next_key(rows: &[RowRecord], model: &ModelSpec) -> Value {
    let integer_kind = model
        .field(model.data_key())
        .is_some_and(|spec| matches!(spec.kind, FieldKind::Id | FieldKind::Number));
    let mut keys = rows.iter().filter_map(|row| row.key(model));
    if !integer_kind || !keys.all(Value::is_i64) {
        return Value::String(Ulid::new().to_string().to_lowercase());
    }
    let max = rows
        .iter()
        .filter_map(|row| row.key(model).and_then(Value::as_i64))
        .max()
        .unwrap_or(0);
    Value::from(max + 1)
}

#[async_trait::async_trait]
impl Gateway for MemoryGateway {
    async fn list(&self, model: &ModelSpec) -> Result<Vec<RowRecord>, GatewayError> {
        Ok(self.records(model.resource()))
    }

    async fn get(&self, model: &ModelSpec, key: &Value) -> Result<RowRecord, GatewayError> {
        self.tables
            .get(model.resource())
            .and_then(|rows| rows.iter().find(|row| row.has_key(model, key)).cloned())
            .ok_or_else(|| GatewayError::not_found(model.resource(), value_text(key)))
    }

    async fn update(
        &self,
        model: &ModelSpec,
        key: Option<Value>,
        record: &RowRecord,
    ) -> Result<RowRecord, GatewayError> {
        let mut rows = self.tables.entry(model.resource().to_string()).or_default();
        let mut stored = record.clone();

        if is_new_key(key.as_ref()) {
            stored.set(model.data_key(), next_key(&rows, model));
            rows.push(stored.clone());
            return Ok(stored);
        }

        let key = key.unwrap_or(Value::Null);
        stored.set(model.data_key(), key.clone());
        match rows
            .iter()
            .position(|row| row.key(model).is_some_and(|k| keys_equal(k, &key)))
        {
            Some(index) => rows[index] = stored.clone(),
            None => rows.push(stored.clone()),
        }
        Ok(stored)
    }

    async fn delete(&self, model: &ModelSpec, key: &Value) -> Result<(), GatewayError> {
        let mut rows = self
            .tables
            .get_mut(model.resource())
            .ok_or_else(|| GatewayError::not_found(model.resource(), value_text(key)))?;
        let index = rows
            .iter()
            .position(|row| row.has_key(model, key))
            .ok_or_else(|| GatewayError::not_found(model.resource(), value_text(key)))?;
        rows.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_spec::{catalog, FieldSpec};

    #[tokio::test]
    async fn creates_with_next_key() {
        let model = catalog::card_set().unwrap();
        let gw = MemoryGateway::demo();
        let created = gw
            .update(&model, None, &RowRecord::new().with("Name", "Powers of two"))
            .await
            .unwrap();
        assert_eq!(created.get("CardSetId"), Some(&json!(3)));
        assert_eq!(gw.list(&model).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn string_keyed_resources_get_string_keys() {
        let model = catalog::poker_room().unwrap();
        let gw = MemoryGateway::demo();
        let created = gw
            .update(&model, None, &RowRecord::new().with("Name", "Retro"))
            .await
            .unwrap();
        let key = created.get("PokerRoomId").and_then(Value::as_str).unwrap();
        assert_eq!(key.len(), 26);
        assert_eq!(gw.list(&model).await.unwrap().len(), 2);
        assert!(gw.get(&model, &json!(key)).await.is_ok());

        let notes = ModelSpec::builder("Note")
            .field("Slug", FieldSpec::text().data_key())
            .build()
            .unwrap();
        let note = gw.update(&notes, None, &RowRecord::new()).await.unwrap();
        assert!(note.get("Slug").is_some_and(Value::is_string));
    }

    #[tokio::test]
    async fn zero_key_always_creates() {
        let model = catalog::card_set().unwrap();
        let gw = MemoryGateway::new().with_records(
            "CardSet",
            vec![RowRecord::new().with("CardSetId", 0).with("Name", "Zero")],
        );
        let row = RowRecord::new().with("CardSetId", 0).with("Name", "Renamed");
        let stored = gw.update(&model, Some(json!(0)), &row).await.unwrap();

        assert_eq!(stored.get("CardSetId"), Some(&json!(1)));
        let rows = gw.records("CardSet");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Name"), Some(&json!("Zero")));
    }

    #[tokio::test]
    async fn replaces_in_place() {
        let model = catalog::card_set().unwrap();
        let gw = MemoryGateway::demo();
        let row = RowRecord::new().with("CardSetId", 1).with("Name", "Fib");
        gw.update(&model, row.key(&model).cloned(), &row).await.unwrap();
        let rows = gw.records("CardSet");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Name"), Some(&json!("Fib")));
    }

    #[tokio::test]
    async fn delete_and_get_missing() {
        let model = catalog::card_set().unwrap();
        let gw = MemoryGateway::demo();
        gw.delete(&model, &json!(1)).await.unwrap();
        assert!(matches!(
            gw.get(&model, &json!(1)).await,
            Err(GatewayError::NotFound { .. })
        ));
        assert!(matches!(
            gw.delete(&model, &json!(1)).await,
            Err(GatewayError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn demo_is_consistent_with_catalog() {
        let gw = MemoryGateway::demo();
        for model in catalog::all().unwrap() {
            let rows = gw.list(&model).await.unwrap();
            assert!(!rows.is_empty());
            assert!(rows.iter().all(|row| row.key(&model).is_some()));
        }
    }
}
