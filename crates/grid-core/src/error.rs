//! Error types for the table synchronizer

use crate::state::SyncState;
use grid_column::ColumnError;
use grid_filter::FilterError;
use grid_gateway::GatewayError;
use grid_spec::SpecError;

/// Synchronizer errors
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Model specification is invalid
    #[error("model specification error: {0}")]
    Spec(#[from] SpecError),

    /// Filter cache rejected the operation
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),

    /// Column binding rejected the input
    #[error("column error: {0}")]
    Column(#[from] ColumnError),

    /// Gateway call failed
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// State machine violation
    #[error("illegal state transition: {from} -> {to}")]
    IllegalTransition { from: SyncState, to: SyncState },

    /// Operation needs a loaded grid
    #[error("grid is {0}, not ready")]
    NotReady(SyncState),

    /// No row carries the given data-key value
    #[error("no row with key {0}")]
    UnknownKey(String),

    /// Field is not declared by the model
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// Field has no editor
    #[error("field '{0}' is read-only")]
    ReadOnlyField(String),

    /// Response or confirmation belongs to a model that is no longer bound
    #[error("{0} was issued for a model that is no longer bound")]
    StaleModel(&'static str),

    /// Rows per page not among the allowed sizes
    #[error("page size {0} is not offered")]
    InvalidPageSize(usize),

    /// Configuration values are inconsistent
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file cannot be read
    #[error("cannot read configuration {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML
    #[error("invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl GridError {
    /// Check if this is a configuration error, to be fixed before any row
    /// is rendered
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Spec(_) | Self::InvalidConfig(_) | Self::ConfigIo { .. } | Self::ConfigParse(_)
        )
    }

    /// Check if retrying may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_retryable(),
            _ => false,
        }
    }
}
