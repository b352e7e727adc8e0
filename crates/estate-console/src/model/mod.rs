//! Records managed by the console pages.
//!
//! Each record implements [`Resource`](list_controller::Resource) for the list pages and
//! [`StoredResource`](list_controller::StoredResource) so the in-process stores can play
//! the backend.

pub mod lead;
pub mod property;
pub mod role;
pub mod user;

pub use lead::{Lead, LeadDraft, LeadStatus};
pub use property::{Property, PropertyDraft, PropertyStatus};
pub use role::{Role, RoleDraft};
pub use user::{User, UserDraft};

use list_controller::{FieldError, FieldValue};
use thiserror::Error;

/// Type-safe identifiers, one per record type.
macro_rules! resource_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl From<$name> for FieldValue {
            fn from(id: $name) -> Self {
                FieldValue::Int(i64::from(id.0))
            }
        }
    };
}

resource_id!(UserId, "user");
resource_id!(RoleId, "role");
resource_id!(LeadId, "lead");
resource_id!(PropertyId, "property");

/// Backend-side rejection of a create or update payload.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ModelError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn require(field: &'static str, value: &str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::Missing(field));
    }
    Ok(trimmed.to_string())
}

/// Blank input clears an optional reference.
fn optional_u32(field: &str, value: FieldValue) -> Result<Option<u32>, FieldError> {
    if value.is_blank() {
        return Ok(None);
    }
    match value.as_i64().and_then(|n| u32::try_from(n).ok()) {
        Some(n) => Ok(Some(n)),
        None => Err(FieldError::mismatch(field, "id", value)),
    }
}

fn parse_u32(field: &str, value: FieldValue) -> Result<u32, FieldError> {
    match value.as_i64().and_then(|n| u32::try_from(n).ok()) {
        Some(n) => Ok(n),
        None => Err(FieldError::mismatch(field, "non-negative integer", value)),
    }
}

fn parse_f64(field: &str, value: FieldValue) -> Result<f64, FieldError> {
    match value.as_f64() {
        Some(n) => Ok(n),
        None => Err(FieldError::mismatch(field, "number", value)),
    }
}
