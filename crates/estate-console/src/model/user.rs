//! Console users, including customers.
//!
//! The password travels in the draft only. It is never read back into a draft, so an
//! edit form starts with an empty password and a non-empty one counts as a change.

use super::{optional_u32, require, ModelError, RoleId, UserId};
use list_controller::{FieldError, FieldValue, FormFields, Resource, StoredResource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role_id: Option<RoleId>,
    pub active: bool,
    #[serde(skip)]
    password: String,
}

impl User {
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role_id: Option<u32>,
    pub active: bool,
    pub password: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            role_id: None,
            active: true,
            password: String::new(),
        }
    }
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role_id: Option<RoleId>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role_id: role_id.map(|id| id.0),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }
}

impl FormFields for UserDraft {
    const FIELDS: &'static [&'static str] =
        &["name", "email", "phone", "role_id", "active", "password"];
    const WRITE_ONLY: &'static [&'static str] = &["password"];

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(self.name.clone().into()),
            "email" => Some(self.email.clone().into()),
            "phone" => Some(self.phone.clone().into()),
            "role_id" => self.role_id.map(FieldValue::from),
            "active" => Some(self.active.into()),
            "password" => Some(self.password.clone().into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "name" => self.name = value.to_string(),
            "email" => self.email = value.to_string(),
            "phone" => self.phone = value.to_string(),
            "role_id" => self.role_id = optional_u32(field, value)?,
            "active" => {
                self.active = match value.as_bool() {
                    Some(active) => active,
                    None => return Err(FieldError::mismatch(field, "boolean", value)),
                }
            }
            "password" => self.password = value.to_string(),
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

impl Resource for User {
    type Id = UserId;
    type Draft = UserDraft;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.clone().into()),
            "email" => Some(self.email.clone().into()),
            "phone" => Some(self.phone.clone().into()),
            "role_id" => self.role_id.map(FieldValue::from),
            "active" => Some(self.active.into()),
            _ => None,
        }
    }

    fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            role_id: self.role_id.map(|id| id.0),
            active: self.active,
            password: String::new(),
        }
    }
}

impl StoredResource for User {
    type Error = ModelError;

    fn from_draft(id: UserId, draft: UserDraft) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            name: require("name", &draft.name)?,
            email: require("email", &draft.email)?.to_lowercase(),
            phone: draft.phone.trim().to_string(),
            role_id: draft.role_id.map(RoleId),
            active: draft.active,
            password: require("password", &draft.password)?,
        })
    }

    fn apply_draft(&mut self, draft: UserDraft) -> Result<(), ModelError> {
        let name = require("name", &draft.name)?;
        let email = require("email", &draft.email)?.to_lowercase();
        self.name = name;
        self.email = email;
        self.phone = draft.phone.trim().to_string();
        self.role_id = draft.role_id.map(RoleId);
        self.active = draft.active;
        // An empty password keeps the current one.
        if !draft.password.trim().is_empty() {
            self.password = draft.password;
        }
        Ok(())
    }

    /// E-mail addresses are unique.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.email == other.email
    }
}
