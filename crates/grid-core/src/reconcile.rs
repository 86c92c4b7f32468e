//! Reconciliation of server responses into the row collection
//!
//! Matching is by data-key value. When the collection holds duplicate keys
//! only the first match is touched.

use grid_spec::{keys_equal, value_text, ModelSpec, RowRecord};
use serde_json::Value;

/// What an upsert did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// Replaced the row at this index
    Updated(usize),
    /// Appended at this index
    Appended(usize),
}

impl Upsert {
    /// Index of the affected row
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Updated(i) | Self::Appended(i) => i,
        }
    }
}

/// Position of the first row whose key equals `key`
#[must_use]
pub fn find_by_key(rows: &[RowRecord], model: &ModelSpec, key: &Value) -> Option<usize> {
    rows.iter().position(|row| row.has_key(model, key))
}

/// Replace the row with the record's key in place, or append it
pub fn upsert(rows: &mut Vec<RowRecord>, model: &ModelSpec, record: RowRecord) -> Upsert {
    let found = record
        .key(model)
        .and_then(|key| find_by_key(rows, model, key));
    match found {
        Some(index) => {
            rows[index] = record;
            Upsert::Updated(index)
        }
        None => {
            rows.push(record);
            Upsert::Appended(rows.len() - 1)
        }
    }
}

/// Remove the first row with `key`, keeping the others in order
pub fn remove(rows: &mut Vec<RowRecord>, model: &ModelSpec, key: &Value) -> Option<RowRecord> {
    find_by_key(rows, model, key).map(|index| rows.remove(index))
}

/// Key values carried by more than one row, each reported once
#[must_use]
pub fn duplicate_keys(rows: &[RowRecord], model: &ModelSpec) -> Vec<String> {
    let mut seen: Vec<&Value> = Vec::with_capacity(rows.len());
    let mut duplicates: Vec<&Value> = Vec::new();
    for key in rows.iter().filter_map(|row| row.key(model)) {
        if seen.iter().any(|s| keys_equal(s, key)) {
            if !duplicates.iter().any(|d| keys_equal(d, key)) {
                duplicates.push(key);
            }
        } else {
            seen.push(key);
        }
    }
    duplicates.into_iter().map(value_text).collect()
}
