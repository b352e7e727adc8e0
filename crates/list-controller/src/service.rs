//! # Resource Service
//!
//! The seam between the list controller and whatever actually stores the records: a REST
//! client in the console, the in-process [`ResourceStore`](crate::ResourceStore) in demos
//! and tests, or a [`MockService`](crate::mock::MockService) in unit tests.

use crate::entity::Resource;
use crate::error::ServiceError;
use crate::field::FieldValue;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Server-side scoping for a `list` call: exact-match filters the service applies before
/// returning the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    pub field_equals: BTreeMap<String, FieldValue>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.field_equals.insert(field.into(), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.field_equals.is_empty()
    }

    /// Whether `item` satisfies every scoping entry.
    pub fn matches<R: Resource>(&self, item: &R) -> bool {
        self.field_equals
            .iter()
            .all(|(field, expected)| item.field(field).map_or(false, |v| v.matches(expected)))
    }
}

/// CRUD operations for one entity type.
#[async_trait]
pub trait ResourceService<R: Resource>: Send + Sync {
    /// Fetch the collection, optionally scoped server-side.
    async fn list(&self, query: Option<&ListQuery>) -> Result<Vec<R>, ServiceError>;

    async fn create(&self, payload: R::Draft) -> Result<R, ServiceError>;

    async fn update(&self, id: R::Id, payload: R::Draft) -> Result<R, ServiceError>;

    async fn remove(&self, id: R::Id) -> Result<(), ServiceError>;

    /// Whether `list` honours a [`ListQuery`]. Services that ignore it get filtered
    /// locally instead.
    fn supports_remote_filter(&self) -> bool {
        false
    }
}
