//! Grid Gateway - the CRUD API surface consumed by the table synchronizer
//!
//! - [`Gateway`]: async `list` / `get` / `update` / `delete`
//! - [`HttpGateway`]: REST implementation over `reqwest` with bearer auth
//! - [`MemoryGateway`]: in-process store for tests and demo mode
//! - [`AuthProvider`]: source of the bearer credential; a missing credential
//!   stops the call before any request is sent

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod auth;
mod config;
pub mod error;
mod gateway;
mod http;
mod memory;

pub use auth::{AuthProvider, NoAuth, StaticToken};
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::{is_new_key, Gateway};
pub use http::HttpGateway;
pub use memory::MemoryGateway;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
