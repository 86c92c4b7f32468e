//! Gateway trait

use crate::error::GatewayError;
use grid_spec::{ModelSpec, RowRecord};
use serde_json::Value;
use std::sync::Arc;

/// Asynchronous CRUD surface of the remote persistence service
///
/// Every method may suspend the caller while awaiting I/O. Implementations
/// never touch grid state; reconciliation is the caller's job.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Whether prerequisite context (credentials) is in place for calls
    fn is_available(&self) -> bool {
        true
    }

    /// All records of the model's resource
    async fn list(&self, model: &ModelSpec) -> Result<Vec<RowRecord>, GatewayError>;

    /// One record by data-key value
    async fn get(&self, model: &ModelSpec, key: &Value) -> Result<RowRecord, GatewayError>;

    /// Create (`key` unset) or replace a full record, returning the stored record
    async fn update(
        &self,
        model: &ModelSpec,
        key: Option<Value>,
        record: &RowRecord,
    ) -> Result<RowRecord, GatewayError>;

    /// Remove a record by data-key value
    async fn delete(&self, model: &ModelSpec, key: &Value) -> Result<(), GatewayError>;
}

#[async_trait::async_trait]
impl<G: Gateway + ?Sized> Gateway for Arc<G> {
    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    async fn list(&self, model: &ModelSpec) -> Result<Vec<RowRecord>, GatewayError> {
        (**self).list(model).await
    }

    async fn get(&self, model: &ModelSpec, key: &Value) -> Result<RowRecord, GatewayError> {
        (**self).get(model, key).await
    }

    async fn update(
        &self,
        model: &ModelSpec,
        key: Option<Value>,
        record: &RowRecord,
    ) -> Result<RowRecord, GatewayError> {
        (**self).update(model, key, record).await
    }

    async fn delete(&self, model: &ModelSpec, key: &Value) -> Result<(), GatewayError> {
        (**self).delete(model, key).await
    }
}

/// Whether a data-key value marks a record the server has not stored yet
///
/// Absent, `null`, `0` and `""` all count as unsaved, matching the backend's
/// default key for new entities. A stored row whose key really is `0` can
/// therefore never be replaced: every update of it is sent as a create
/// (`POST`) and comes back under a newly assigned key.
#[must_use]
pub fn is_new_key(key: Option<&Value>) -> bool {
    match key {
        None | Some(Value::Null) => true,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_keys() {
        assert!(is_new_key(None));
        assert!(is_new_key(Some(&json!(null))));
        assert!(is_new_key(Some(&json!(0))));
        assert!(is_new_key(Some(&json!(""))));
        assert!(!is_new_key(Some(&json!(2))));
        assert!(!is_new_key(Some(&json!("3f2a"))));
    }
}
