//! # Resource Traits
//!
//! [`Resource`] is the contract every record shown on a management page satisfies:
//! users, roles, leads, properties, bookings. The controller never looks inside a
//! record except through [`Resource::field`], so one controller implementation serves
//! every page.
//!
//! [`StoredResource`] adds the two hooks the in-process [`ResourceStore`](crate::ResourceStore)
//! needs to play the part of the backend: building a record from a create payload and
//! applying an update payload.

use crate::field::{FieldValue, FormFields};
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record managed by a list/CRUD page.
///
/// # Associated Types
/// - `Id`: the stable identifier. Used to address updates and deletions and to check
///   that an edit form still refers to a record in the current collection.
/// - `Draft`: the editable projection used as the create/update payload.
pub trait Resource: Clone + Debug + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Debug + Display + Send + Sync;

    type Draft: FormFields;

    fn id(&self) -> &Self::Id;

    /// Read a named field for filtering and searching.
    ///
    /// Returning `None` for an unknown or unset field is always safe: filters treat it
    /// as a non-match.
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Copy the editable fields into a fresh draft. Write-only fields stay empty.
    fn to_draft(&self) -> Self::Draft;
}

/// Backend-side hooks for records held by a [`ResourceStore`](crate::ResourceStore).
///
/// Only the in-process store uses these; a page talking to a remote API never does.
pub trait StoredResource: Resource
where
    Self::Id: From<u32>,
{
    /// The backend's rejection reason.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the stored record from a create payload.
    fn from_draft(id: Self::Id, draft: Self::Draft) -> Result<Self, Self::Error>;

    /// Apply an update payload in place.
    fn apply_draft(&mut self, draft: Self::Draft) -> Result<(), Self::Error>;

    /// Whether `self` may not coexist with `other` (e.g. duplicate e-mail).
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }
}
