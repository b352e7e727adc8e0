//! # Errors
//!
//! Two layers: [`ServiceError`] is what a resource service reports, and
//! [`ControllerError`] is what the list controller reports to the presentation layer.
//! Only `Mutation` and `Fetch` are user-facing failures; `Busy` is a debounced duplicate
//! and the UI treats it as a no-op.

use crate::field::FieldError;
use crate::form::FieldErrors;
use crate::guard::MutationKind;

/// Errors reported by a [`ResourceService`](crate::ResourceService).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Service closed")]
    ServiceClosed,
    #[error("Service dropped response channel")]
    ServiceDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflicts with existing item: {0}")]
    Conflict(String),
    #[error("Rejected: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Errors reported by the [`ResourceListController`](crate::ResourceListController).
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// Client-side validation blocked the submit. Never reaches the service.
    #[error("Validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// A mutation of the same kind is already in flight; the duplicate was dropped.
    #[error("A {0} is already in flight")]
    Busy(MutationKind),

    /// The service rejected or failed a create/update/delete.
    #[error("{kind} failed: {source}")]
    Mutation {
        kind: MutationKind,
        #[source]
        source: ServiceError,
    },

    /// The list or remote re-query failed.
    #[error("Failed to fetch collection: {0}")]
    Fetch(#[source] ServiceError),

    #[error("No form is open")]
    FormClosed,

    /// Edit form has no changes; saving is disabled.
    #[error("Nothing to save")]
    NotDirty,

    /// The record is not (or no longer) part of the current collection.
    #[error("Record {0} is not in the current collection")]
    StaleRecord(String),

    #[error("No deletion is pending")]
    NothingToDelete,

    #[error(transparent)]
    Field(#[from] FieldError),
}

impl ControllerError {
    /// Whether the UI should silently ignore this outcome.
    pub fn is_busy(&self) -> bool {
        matches!(self, ControllerError::Busy(_))
    }
}
