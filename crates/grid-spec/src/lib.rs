//! Grid Spec - declarative model specifications
//!
//! The pure-data foundation of the grid engine:
//! - [`FieldKind`]: closed set of field UI categories
//! - [`FieldSpec`]: one field's configuration
//! - [`ModelSpec`]: validated, immutable, ordered field map for one record type
//! - [`RowRecord`]: one persisted entity as returned by the backend
//!
//! # Example
//!
//! ```rust
//! use grid_spec::{FieldSpec, ModelSpec};
//!
//! let spec = ModelSpec::builder("CardSet")
//!     .field("Name", FieldSpec::text().display_name())
//!     .field("Id", FieldSpec::id().data_key().read_only())
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(spec.data_key(), "Id");
//! assert_eq!(spec.display_name(), Some("Name"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod document;
pub mod error;
mod field;
mod kind;
mod model;
mod record;

pub use document::{load_spec, parse_spec, SpecDocument, SpecFormat};
pub use error::SpecError;
pub use field::{FieldSpec, SelectItem};
pub use kind::{DataType, FieldKind};
pub use model::{validate, ModelSpec, ModelSpecBuilder};
pub use record::{keys_equal, value_text, RowRecord};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
