//! Grid Column - resolves field specifications into column bindings
//!
//! For every field of a [`ModelSpec`](grid_spec::ModelSpec) the resolver
//! produces:
//!
//! - a [`FilterWidget`] that parses raw input into a typed predicate
//! - a [`CellFormatter`] that renders the stored value
//! - a [`CellEditor`], absent for read-only fields
//! - the sort/filter [`DataType`](grid_spec::DataType)
//!
//! The frozen attribute is honored only above a width threshold; see
//! [`is_frozen`].
//!
//! # Example
//!
//! ```rust
//! use grid_column::{ColumnResolver, Viewport};
//! use grid_spec::{catalog, RowRecord};
//!
//! let model = catalog::card_set().unwrap();
//! let columns = ColumnResolver::default().resolve(&model, Viewport::new(1024));
//!
//! let row = RowRecord::new().with("CardSetId", 1).with("Name", "Fibonacci");
//! let name = columns.iter().find(|c| c.field == "Name").unwrap();
//! assert_eq!(name.format(&row).to_string(), "Fibonacci");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod editor;
pub mod error;
mod formatter;
mod header;
mod resolver;
mod widget;

pub use editor::CellEditor;
pub use error::ColumnError;
pub use formatter::{format_number, CellFormatter, CellValue, SelectControl};
pub use header::header_text;
pub use resolver::{
    is_frozen, ColumnResolver, ResolvedColumn, ResolverConfig, Viewport, DEFAULT_COLUMN_WIDTH,
    DEFAULT_FREEZE_THRESHOLD,
};
pub use widget::FilterWidget;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
