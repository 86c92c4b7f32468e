//! Synchronizer lifecycle
//!
//! ```text
//! Idle ──▶ Loading ──▶ Ready
//!             ▲          │
//!             └──────────┘  refresh / model change
//! ```

use crate::error::GridError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// Waiting for credentials
    Idle,
    /// Fetch in flight
    Loading,
    /// Rows available (possibly none after a failed fetch)
    Ready,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
        })
    }
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: SyncState) -> &'static [SyncState] {
    use SyncState::{Idle, Loading, Ready};
    match from {
        Idle => &[Loading],
        Loading => &[Ready],
        Ready => &[Loading],
    }
}

/// Validates a state transition
///
/// # Errors
/// `IllegalTransition` when `to` is not reachable from `from`.
pub fn validate_transition(from: SyncState, to: SyncState) -> Result<(), GridError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(GridError::IllegalTransition { from, to })
    }
}
