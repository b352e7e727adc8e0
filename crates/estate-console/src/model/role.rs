use super::{require, ModelError, RoleId};
use list_controller::{FieldError, FieldValue, FormFields, Resource, StoredResource};
use serde::{Deserialize, Serialize};

/// An access role. Users reference roles by id; the customer list is the set of users
/// holding the customer role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleDraft {
    pub name: String,
    pub description: String,
}

impl RoleDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl FormFields for RoleDraft {
    const FIELDS: &'static [&'static str] = &["name", "description"];

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(self.name.clone().into()),
            "description" => Some(self.description.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "name" => self.name = value.to_string(),
            "description" => self.description = value.to_string(),
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

impl Resource for Role {
    type Id = RoleId;
    type Draft = RoleDraft;

    fn id(&self) -> &RoleId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "description" => Some(self.description.clone().into()),
            _ => None,
        }
    }

    fn to_draft(&self) -> RoleDraft {
        RoleDraft::new(self.name.clone(), self.description.clone())
    }
}

impl StoredResource for Role {
    type Error = ModelError;

    fn from_draft(id: RoleId, draft: RoleDraft) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            name: require("name", &draft.name)?,
            description: draft.description.trim().to_string(),
        })
    }

    fn apply_draft(&mut self, draft: RoleDraft) -> Result<(), ModelError> {
        self.name = require("name", &draft.name)?;
        self.description = draft.description.trim().to_string();
        Ok(())
    }

    /// Role names are unique, ignoring case.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
    }
}
