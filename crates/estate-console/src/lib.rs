//! # Estate Console
//!
//! The management pages of the real-estate operations console, built on
//! [`list_controller`]: users, customers, roles, leads, and properties.
//!
//! - **[model]**: the records and their editable drafts
//! - **[pages]**: one controller per screen with its form rules
//! - **[scope]**: which role the customer page is scoped to
//! - **[config]**: `console.toml` loading
//! - **[lifecycle]**: store tasks, shutdown, tracing setup

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod pages;
pub mod scope;

pub use config::{ConsoleConfig, CustomerScope};
pub use error::{ConfigError, ConsoleError, ScopeError};
pub use lifecycle::{setup_tracing, ConsoleSystem};
pub use pages::ConsolePages;
