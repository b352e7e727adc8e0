//! Per-page list settings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// How one management page searches, scopes, and pages its collection.
///
/// ```toml
/// page_size = 10
/// searchable_fields = ["name", "email", "phone"]
/// remote_filter_fields = ["role_id"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub page_size: usize,
    /// Fields the search box matches against.
    pub searchable_fields: Vec<String>,
    /// Field filters the service can apply server-side. A change to one of these
    /// re-queries the service instead of filtering locally.
    pub remote_filter_fields: Vec<String>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            searchable_fields: Vec::new(),
            remote_filter_fields: Vec::new(),
        }
    }
}

impl ListConfig {
    pub fn searching<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            searchable_fields: fields.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_remote_filter(mut self, field: impl Into<String>) -> Self {
        self.remote_filter_fields.push(field.into());
        self
    }

    pub fn is_remote_field(&self, field: &str) -> bool {
        self.remote_filter_fields.iter().any(|f| f == field)
    }
}
