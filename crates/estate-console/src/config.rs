//! # Console Configuration
//!
//! Loaded from a TOML file. Every section is optional; a missing file means defaults.
//!
//! ```toml
//! [users]
//! page_size = 20
//! searchable_fields = ["name", "email", "phone"]
//! remote_filter_fields = ["role_id"]
//!
//! [customers]
//! role_name = "Customer"
//! # role_id = 3        # skips the lookup by name
//! ```
//!
//! A section that is present replaces that page's defaults as a whole, so list every
//! field you want searched.

use crate::error::ConfigError;
use list_controller::ListConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Which users the customer page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerScope {
    /// Role looked up by name when `role_id` is not set.
    pub role_name: String,
    pub role_id: Option<u32>,
}

impl Default for CustomerScope {
    fn default() -> Self {
        Self {
            role_name: "Customer".to_string(),
            role_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub users: ListConfig,
    pub roles: ListConfig,
    pub leads: ListConfig,
    pub properties: ListConfig,
    pub customers: CustomerScope,
    /// Channel buffer for each in-process store.
    pub store_buffer: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            users: ListConfig::searching(["name", "email", "phone"]).with_remote_filter("role_id"),
            roles: ListConfig::searching(["name", "description"]),
            leads: ListConfig::searching(["name", "email", "phone", "source"]),
            properties: ListConfig::searching(["title", "city", "kind"]),
            customers: CustomerScope::default(),
            store_buffer: 32,
        }
    }
}

impl ConsoleConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        debug!(path = %path.display(), ?config, "Loaded config");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let pages = [
            ("users", &self.users),
            ("roles", &self.roles),
            ("leads", &self.leads),
            ("properties", &self.properties),
        ];
        for (name, page) in pages {
            if page.page_size == 0 {
                return Err(ConfigError::Invalid(format!("{name}.page_size must be at least 1")));
            }
        }
        if self.customers.role_id.is_none() && self.customers.role_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "customers needs either role_id or role_name".to_string(),
            ));
        }
        if self.store_buffer == 0 {
            return Err(ConfigError::Invalid("store_buffer must be at least 1".to_string()));
        }
        Ok(())
    }
}
