//! Grid Filter - filter predicates and the draft/applied predicate cache
//!
//! # Core Concepts
//!
//! - [`FilterPredicate`]: match mode plus optional operand, neutral when empty
//! - [`FilterState`]: persistent map of applied predicates plus the global entry
//! - [`FilterCache`]: per-field draft slots and the applied state
//! - [`SharedFilterCache`] / [`FieldFilter`]: the cache shared across columns
//!
//! # Example
//!
//! ```rust
//! use grid_filter::{FilterCache, FilterPredicate};
//! use grid_spec::{FieldSpec, ModelSpec, RowRecord};
//!
//! let model = ModelSpec::builder("CardSet")
//!     .field("Name", FieldSpec::text().display_name())
//!     .field("Id", FieldSpec::id().data_key())
//!     .build()
//!     .unwrap();
//!
//! let mut cache = FilterCache::new(&model);
//! cache.set_draft("Name", FilterPredicate::contains("fib")).unwrap();
//! let applied = cache.apply("Name").unwrap();
//!
//! assert!(applied.matches(&RowRecord::new().with("Name", "Fibonacci")));
//! assert!(!applied.matches(&RowRecord::new().with("Name", "T-Shirt")));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cache;
pub mod error;
mod predicate;
mod state;
pub mod value;

pub use cache::{FieldFilter, FilterCache, SharedFilterCache};
pub use error::FilterError;
pub use predicate::{FilterPredicate, MatchMode, Operand};
pub use state::{FilterEntry, FilterState, GlobalFilter};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
