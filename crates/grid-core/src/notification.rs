//! User-facing notifications

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};
use ulid::Ulid;

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warn,
    Error,
}

/// Toast-style message emitted by the synchronizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Ulid,
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    /// How long the message stays visible
    pub life: Duration,
}

impl Notification {
    /// Create notification
    #[must_use]
    pub fn new(
        severity: Severity,
        summary: impl Into<String>,
        detail: impl Into<String>,
        life: Duration,
    ) -> Self {
        Self {
            id: Ulid::new(),
            severity,
            summary: summary.into(),
            detail: detail.into(),
            life,
        }
    }

    /// Whether the message has outlived its `life` at `now`
    ///
    /// The creation time is the millisecond timestamp carried by the id.
    #[must_use]
    pub fn is_expired(&self, now: SystemTime) -> bool {
        self.id.datetime() + self.life <= now
    }

    /// `Update Success`: `<label> updated successfully`
    #[must_use]
    pub fn updated(label: &str, life: Duration) -> Self {
        Self::new(
            Severity::Success,
            "Update Success",
            format!("{label} updated successfully"),
            life,
        )
    }

    /// `Delete Success`: `<label> deleted successfully`
    #[must_use]
    pub fn deleted(label: &str, life: Duration) -> Self {
        Self::new(
            Severity::Success,
            "Delete Success",
            format!("{label} deleted successfully"),
            life,
        )
    }

    /// Failure with the error text as detail
    #[must_use]
    pub fn failed(summary: &str, error: &impl std::fmt::Display, life: Duration) -> Self {
        Self::new(Severity::Error, summary, error.to_string(), life)
    }
}
