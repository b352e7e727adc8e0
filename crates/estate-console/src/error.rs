//! Error types for the console wiring.

use list_controller::{ControllerError, ServiceError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `console.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Errors resolving which users count as customers.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// No role with the configured name exists, and no explicit id was configured.
    #[error("Role '{0}' not found; set customers.role_id or create the role")]
    RoleNotFound(String),

    #[error("Failed to look up roles: {0}")]
    Lookup(#[from] ServiceError),
}

/// Errors from starting or stopping the console.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error(transparent)]
    Controller(#[from] ControllerError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Store task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
