use super::{parse_f64, parse_u32, require, ModelError, PropertyId};
use list_controller::{FieldError, FieldValue, FormFields, Resource, StoredResource};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyStatus {
    #[default]
    Available,
    Reserved,
    Sold,
}

impl PropertyStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyStatus::Available => "AVAILABLE",
            PropertyStatus::Reserved => "RESERVED",
            PropertyStatus::Sold => "SOLD",
        }
    }
}

impl Display for PropertyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(PropertyStatus::Available),
            "RESERVED" => Ok(PropertyStatus::Reserved),
            "SOLD" => Ok(PropertyStatus::Sold),
            _ => Err(()),
        }
    }
}

/// A unit on the books: villa, apartment, plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub title: String,
    pub city: String,
    pub kind: String,
    pub price: f64,
    pub bedrooms: u32,
    pub status: PropertyStatus,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDraft {
    pub title: String,
    pub city: String,
    pub kind: String,
    pub price: f64,
    pub bedrooms: u32,
    pub status: PropertyStatus,
}

impl PropertyDraft {
    pub fn new(title: impl Into<String>, city: impl Into<String>, kind: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            city: city.into(),
            kind: kind.into(),
            price,
            ..Self::default()
        }
    }

    pub fn with_bedrooms(mut self, bedrooms: u32) -> Self {
        self.bedrooms = bedrooms;
        self
    }
}

impl FormFields for PropertyDraft {
    const FIELDS: &'static [&'static str] = &["title", "city", "kind", "price", "bedrooms", "status"];

    fn get(&self, field: &str) -> Option<FieldValue> {
        match field {
            "title" => Some(self.title.clone().into()),
            "city" => Some(self.city.clone().into()),
            "kind" => Some(self.kind.clone().into()),
            "price" => Some(self.price.into()),
            "bedrooms" => Some(self.bedrooms.into()),
            "status" => Some(self.status.as_str().into()),
            _ => None,
        }
    }

    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError> {
        match field {
            "title" => self.title = value.to_string(),
            "city" => self.city = value.to_string(),
            "kind" => self.kind = value.to_string(),
            "price" => self.price = parse_f64(field, value)?,
            "bedrooms" => self.bedrooms = parse_u32(field, value)?,
            "status" => {
                self.status = match value.to_string().parse() {
                    Ok(status) => status,
                    Err(()) => return Err(FieldError::mismatch(field, "property status", value)),
                }
            }
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

impl Resource for Property {
    type Id = PropertyId;
    type Draft = PropertyDraft;

    fn id(&self) -> &PropertyId {
        &self.id
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            other => self.to_draft().get(other),
        }
    }

    fn to_draft(&self) -> PropertyDraft {
        PropertyDraft {
            title: self.title.clone(),
            city: self.city.clone(),
            kind: self.kind.clone(),
            price: self.price,
            bedrooms: self.bedrooms,
            status: self.status,
        }
    }
}

impl StoredResource for Property {
    type Error = ModelError;

    fn from_draft(id: PropertyId, draft: PropertyDraft) -> Result<Self, ModelError> {
        let mut property = Self {
            id,
            title: String::new(),
            city: String::new(),
            kind: String::new(),
            price: 0.0,
            bedrooms: 0,
            status: PropertyStatus::Available,
        };
        property.apply_draft(draft)?;
        Ok(property)
    }

    fn apply_draft(&mut self, draft: PropertyDraft) -> Result<(), ModelError> {
        if !(draft.price.is_finite() && draft.price > 0.0) {
            return Err(ModelError::Invalid {
                field: "price",
                reason: format!("{} is not a positive amount", draft.price),
            });
        }
        let title = require("title", &draft.title)?;
        let city = require("city", &draft.city)?;
        self.title = title;
        self.city = city;
        self.kind = draft.kind.trim().to_string();
        self.price = draft.price;
        self.bedrooms = draft.bedrooms;
        self.status = draft.status;
        Ok(())
    }

    /// Two listings with the same title in the same city are the same unit.
    fn conflicts_with(&self, other: &Self) -> bool {
        self.title.eq_ignore_ascii_case(&other.title) && self.city.eq_ignore_ascii_case(&other.city)
    }
}
