use super::{optional_u32, require, LeadId, ModelError, UserId};
use list_controller::{FieldError, FieldValue, FormFields, Resource, StoredResource};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Lost,
}

impl LeadStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Lost => "LOST",
        }
    }
}

impl Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEW" => Ok(LeadStatus::New),
            "CONTACTED" => Ok(LeadStatus::Contacted),
            "QUALIFIED" => Ok(LeadStatus::Qualified),
            "LOST" => Ok(LeadStatus::Lost),
            _ => Err(()),
        }
    }
}

/// A prospective buyer or tenant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Where the lead came from ("Website", "Referral", ...).
    pub source: String,
    pub status: LeadStatus,
    /// The agent following up, if any.
    pub assigned_to: Option<UserId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub source: String,
    pub status: LeadStatus,
    pub assigned_to: Option<u32>,
}

impl LeadDraft {
    pub fn new(name: impl Into<String>, phone: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            source: source.into(),
            ..Self::default()
        }
    }
}

impl FormFields for LeadDraft {
    const FIELDS: &'static [&'static str] =
        &["name", "email", "phone", "source", "status", "assigned_to"];

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" => Some(self.name.clone().into()),
            "email" => Some(self.email.clone().into()),
            "phone" => Some(self.phone.clone().into()),
            "source" => Some(self.source.clone().into()),
            "status" => Some(self.status.as_str().into()),
            "assigned_to" => self.assigned_to.map(FieldValue::from),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "name" => self.name = value.to_string(),
            "email" => self.email = value.to_string(),
            "phone" => self.phone = value.to_string(),
            "source" => self.source = value.to_string(),
            "status" => {
                self.status = match value.to_string().parse() {
                    Ok(status) => status,
                    Err(()) => return Err(FieldError::mismatch(field, "lead status", value)),
                }
            }
            "assigned_to" => self.assigned_to = optional_u32(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

impl Resource for Lead {
    type Id = LeadId;
    type Draft = LeadDraft;

    fn id(&self) -> &LeadId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "assigned_to" => self.assigned_to.map(FieldValue::from),
            other => self.to_draft().get(other),
        }
    }

    fn to_draft(&self) -> LeadDraft {
        LeadDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            source: self.source.clone(),
            status: self.status,
            assigned_to: self.assigned_to.map(|id| id.0),
        }
    }
}

impl StoredResource for Lead {
    type Error = ModelError;

    fn from_draft(id: LeadId, draft: LeadDraft) -> Result<Self, ModelError> {
        let mut lead = Self {
            id,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            source: String::new(),
            status: LeadStatus::New,
            assigned_to: None,
        };
        lead.apply_draft(draft)?;
        Ok(lead)
    }

    fn apply_draft(&mut self, draft: LeadDraft) -> Result<(), ModelError> {
        let name = require("name", &draft.name)?;
        if draft.email.trim().is_empty() && draft.phone.trim().is_empty() {
            return Err(ModelError::Invalid {
                field: "phone",
                reason: "a lead needs a phone number or an e-mail address".into(),
            });
        }
        self.name = name;
        self.email = draft.email.trim().to_lowercase();
        self.phone = draft.phone.trim().to_string();
        self.source = draft.source.trim().to_string();
        self.status = draft.status;
        self.assigned_to = draft.assigned_to.map(UserId);
        Ok(())
    }
}
