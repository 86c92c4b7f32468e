//! Grid Core - keeps a spec-driven grid synchronized with a CRUD API
//!
//! # Architecture
//!
//! ```text
//! ModelSpec ──▶ ColumnResolver ──▶ columns ─┐
//!     │                                      ├──▶ TableSynchronizer ◀──▶ Gateway
//!     └──────▶ SharedFilterCache ────────────┘          │
//!                                                 TableView (rows, filters,
//!                                                 sort, page, add form)
//! ```
//!
//! # Example
//!
//! ```rust
//! use grid_core::{GridConfig, TableSynchronizer};
//! use grid_gateway::MemoryGateway;
//! use grid_spec::{catalog, RowRecord};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let model = catalog::card_set().unwrap();
//! let mut grid = TableSynchronizer::new(model, MemoryGateway::demo(), GridConfig::default());
//! grid.start().await.unwrap();
//!
//! let draft = RowRecord::new().with("Name", "Powers of two");
//! let stored = grid.complete_edit(draft).await.unwrap();
//! assert_eq!(grid.rows().len(), 3);
//! assert_eq!(grid.drain_notifications()[0].detail, "Powers of two updated successfully");
//! assert_eq!(stored.get("CardSetId"), Some(&serde_json::json!(3)));
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod config;
pub mod error;
mod notification;
pub mod reconcile;
mod state;
mod sync;
mod view;

pub use config::GridConfig;
pub use error::GridError;
pub use notification::{Notification, Severity};
pub use reconcile::Upsert;
pub use state::{allowed_transitions, validate_transition, SyncState};
pub use sync::{
    DeleteConfirmation, EditResponse, PendingEdit, RenderedCell, RenderedRow, TableSynchronizer,
    MAX_QUEUED_NOTIFICATIONS,
};
pub use view::{compare_values, Pagination, SortOrder, SortState, TableView};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
