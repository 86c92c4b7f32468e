//! Grid configuration
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! freeze_threshold = 768
//! default_column_width = "14rem"
//! rows_per_page = 10
//! page_size_options = [10, 25, 50, 100]
//! notification_life_ms = 3000
//! viewport_width = 1280
//!
//! [gateway]
//! base_url = "http://localhost:5000"
//! api_prefix = "v1"
//! timeout_ms = 30000
//! ```

use crate::error::GridError;
use grid_column::ResolverConfig;
use grid_gateway::GatewayConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Grid configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Viewport width (px) above which frozen columns stay frozen
    pub freeze_threshold: u32,
    /// Minimum width of columns without an explicit width
    pub default_column_width: String,
    /// Initial rows per page
    pub rows_per_page: usize,
    /// Selectable rows-per-page values
    pub page_size_options: Vec<usize>,
    /// How long notifications stay visible
    pub notification_life_ms: u64,
    /// Viewport width assumed until the UI reports one
    pub viewport_width: u32,
    /// Remote API settings
    pub gateway: GatewayConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            freeze_threshold: grid_column::DEFAULT_FREEZE_THRESHOLD,
            default_column_width: grid_column::DEFAULT_COLUMN_WIDTH.to_string(),
            rows_per_page: 10,
            page_size_options: vec![10, 25, 50, 100],
            notification_life_ms: 3000,
            viewport_width: 1280,
            gateway: GatewayConfig::default(),
        }
    }
}

impl GridConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With freeze threshold
    #[inline]
    #[must_use]
    pub fn with_freeze_threshold(mut self, threshold: u32) -> Self {
        self.freeze_threshold = threshold;
        self
    }

    /// With rows per page
    #[inline]
    #[must_use]
    pub fn with_rows_per_page(mut self, rows: usize) -> Self {
        self.rows_per_page = rows;
        self
    }

    /// With selectable page sizes
    #[inline]
    #[must_use]
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// With initial viewport width
    #[inline]
    #[must_use]
    pub fn with_viewport_width(mut self, width: u32) -> Self {
        self.viewport_width = width;
        self
    }

    /// With gateway settings
    #[inline]
    #[must_use]
    pub fn with_gateway(mut self, gateway: GatewayConfig) -> Self {
        self.gateway = gateway;
        self
    }

    /// Notification lifetime
    #[inline]
    #[must_use]
    pub fn notification_life(&self) -> Duration {
        Duration::from_millis(self.notification_life_ms)
    }

    /// Settings for the column resolver
    #[must_use]
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            freeze_threshold: self.freeze_threshold,
            default_width: self.default_column_width.clone(),
        }
    }

    /// Check internal consistency
    ///
    /// # Errors
    /// `InvalidConfig` when no page sizes are offered or the initial page
    /// size is not one of them.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err(GridError::InvalidConfig(
                "page_size_options must be non-empty and positive".to_string(),
            ));
        }
        if !self.page_size_options.contains(&self.rows_per_page) {
            return Err(GridError::InvalidConfig(format!(
                "rows_per_page {} is not one of {:?}",
                self.rows_per_page, self.page_size_options
            )));
        }
        Ok(())
    }

    /// Parse TOML text
    ///
    /// # Errors
    /// `ConfigParse` for malformed TOML, `InvalidConfig` for inconsistent values.
    pub fn from_toml(text: &str) -> Result<Self, GridError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    ///
    /// # Errors
    /// `ConfigIo` when the file cannot be read, otherwise as [`Self::from_toml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GridError::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::info!("Loaded grid configuration from {}", path.display());
        Ok(config)
    }
}
