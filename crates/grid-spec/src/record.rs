//! Dynamically-typed persisted records
//!
//! A [`RowRecord`] is one entity instance exactly as the backend returned it.
//! Records are never partially updated; every mutation replaces the whole
//! record with the authoritative server response.

use crate::model::ModelSpec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Mapping from field name to JSON value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRecord(Map<String, Value>);

impl RowRecord {
    /// Create empty record
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON object; `None` for any other JSON value
    #[inline]
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Builder-style field assignment
    #[inline]
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Raw field value
    #[inline]
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field value
    #[inline]
    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.0.insert(field.into(), value);
    }

    /// Identity value (the data-key field), `None` when absent or null
    #[inline]
    #[must_use]
    pub fn key<'a>(&'a self, model: &ModelSpec) -> Option<&'a Value> {
        self.0.get(model.data_key()).filter(|v| !v.is_null())
    }

    /// Whether this record shares `key` as its identity
    #[inline]
    #[must_use]
    pub fn has_key(&self, model: &ModelSpec, key: &Value) -> bool {
        self.key(model).is_some_and(|own| keys_equal(own, key))
    }

    /// Name of the record for user-facing messages
    ///
    /// Uses the display-name field and falls back to the data key when the
    /// model has no display field or the value is missing.
    #[must_use]
    pub fn label(&self, model: &ModelSpec) -> String {
        model
            .display_name()
            .and_then(|field| self.0.get(field))
            .filter(|v| !v.is_null())
            .or_else(|| self.key(model))
            .map(value_text)
            .unwrap_or_default()
    }

    /// Iterate over fields
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields present
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if no fields are present
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwrap into the JSON object
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }

    /// JSON value view of the record
    #[inline]
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl From<Map<String, Value>> for RowRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Data-key equality
///
/// Numbers compare by numeric value so `1` and `1.0` address the same row;
/// everything else compares structurally.
#[must_use]
pub fn keys_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Plain-text rendering of a JSON value: strings unquoted, null empty
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
