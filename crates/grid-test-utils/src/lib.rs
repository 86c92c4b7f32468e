//! Testing utilities for the grid workspace
//!
//! Shared fixtures: the two-field card-set model used by the scenario
//! tests, record builders and gateways with controllable timing.

#![allow(missing_docs)]

use grid_gateway::{Gateway, GatewayError, MemoryGateway};
use grid_spec::{FieldSpec, ModelSpec, RowRecord};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// `{Name: text(display name), Id: id(data key, read-only)}`
pub fn scenario_spec() -> ModelSpec {
    ModelSpec::builder("CardSet")
        .field("Name", FieldSpec::text().display_name())
        .field("Id", FieldSpec::id().data_key().read_only())
        .build()
        .unwrap()
}

/// Row of the scenario model
pub fn record(id: i64, name: &str) -> RowRecord {
    RowRecord::new().with("Id", id).with("Name", name)
}

/// Rows `1..=n` named `Row <i>`
pub fn records(n: i64) -> Vec<RowRecord> {
    (1..=n).map(|i| record(i, &format!("Row {i}"))).collect()
}

/// Memory gateway holding `rows` for the scenario model's resource
pub fn seeded_gateway(rows: Vec<RowRecord>) -> Arc<MemoryGateway> {
    let model = scenario_spec();
    Arc::new(MemoryGateway::new().with_records(model.resource(), rows))
}

/// Gateway that delays updates per data-key value before answering
///
/// Lets tests issue several edits and observe responses arriving out of
/// issue order.
#[derive(Debug)]
pub struct DelayedGateway {
    inner: Arc<MemoryGateway>,
    delays: Vec<(Value, Duration)>,
}

impl DelayedGateway {
    pub fn new(inner: Arc<MemoryGateway>) -> Self {
        Self {
            inner,
            delays: Vec::new(),
        }
    }

    /// Delay updates of the row with `key`
    pub fn with_delay(mut self, key: impl Into<Value>, delay: Duration) -> Self {
        self.delays.push((key.into(), delay));
        self
    }

    fn delay_for(&self, key: Option<&Value>) -> Duration {
        key.and_then(|key| {
            self.delays
                .iter()
                .find(|(k, _)| grid_spec::keys_equal(k, key))
                .map(|(_, d)| *d)
        })
        .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl Gateway for DelayedGateway {
    async fn list(&self, model: &ModelSpec) -> Result<Vec<RowRecord>, GatewayError> {
        self.inner.list(model).await
    }

    async fn get(&self, model: &ModelSpec, key: &Value) -> Result<RowRecord, GatewayError> {
        self.inner.get(model, key).await
    }

    async fn update(
        &self,
        model: &ModelSpec,
        key: Option<Value>,
        record: &RowRecord,
    ) -> Result<RowRecord, GatewayError> {
        tokio::time::sleep(self.delay_for(key.as_ref())).await;
        self.inner.update(model, key, record).await
    }

    async fn delete(&self, model: &ModelSpec, key: &Value) -> Result<(), GatewayError> {
        self.inner.delete(model, key).await
    }
}
