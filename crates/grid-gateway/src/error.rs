//! Error types for gateway calls

/// Gateway call failures
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// No usable credential; the request was never sent
    #[error("no bearer credential available; request not sent")]
    Unauthenticated,

    /// Connection, timeout or protocol failure
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Resource or record does not exist
    #[error("not found: {path}")]
    NotFound { path: String },

    /// Response body is not the expected JSON shape
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Response record carries no data-key value
    #[error("{resource} response has no value for data key '{data_key}'")]
    MissingKey { resource: String, data_key: String },

    /// Gateway settings are unusable
    #[error("invalid gateway configuration: {0}")]
    Config(String),
}

impl GatewayError {
    /// Check if retrying the same call may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Check if the failure is about credentials
    #[must_use]
    pub fn is_auth(&self) -> bool {
        match self {
            Self::Unauthenticated => true,
            Self::Status { status, .. } => matches!(status, 401 | 403),
            _ => false,
        }
    }

    pub(crate) fn not_found(resource: &str, key: impl std::fmt::Display) -> Self {
        Self::NotFound {
            path: format!("{resource}/{key}"),
        }
    }
}
