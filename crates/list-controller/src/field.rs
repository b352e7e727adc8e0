//! # Field Values
//!
//! Every management page looks at its records through named fields: the table filters
//! on them, the search box matches against them, and the modal form edits them. This
//! module defines the loosely-typed [`FieldValue`] that crosses that boundary and the
//! [`FormFields`] trait that editable drafts implement.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

/// A single named value read from a resource or typed into a form.
///
/// Values arriving from the UI are usually text; the typed accessors ([`as_i64`],
/// [`as_f64`], [`as_bool`]) accept either the typed variant or a parseable string.
///
/// [`as_i64`]: FieldValue::as_i64
/// [`as_f64`]: FieldValue::as_f64
/// [`as_bool`]: FieldValue::as_bool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    /// Whether the value counts as "nothing entered" (empty or whitespace-only text).
    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(s) if s.trim().is_empty())
    }

    /// Borrow the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(n) => Some(*n),
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Text(s) => s.trim().parse().ok(),
            FieldValue::Bool(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Whether this record value equals the filter value `expected`.
    ///
    /// `expected` is read as this value's type, so text typed into a filter box matches
    /// typed fields: `"3"` matches `Int(3)`, `"yes"` matches `Bool(true)`. Text compares
    /// exactly.
    pub fn matches(&self, expected: &FieldValue) -> bool {
        match self {
            FieldValue::Int(n) => expected.as_i64() == Some(*n),
            FieldValue::Float(n) => expected.as_f64() == Some(*n),
            FieldValue::Bool(b) => expected.as_bool() == Some(*b),
            FieldValue::Text(s) => match expected {
                FieldValue::Text(t) => s == t,
                other => *s == other.to_string(),
            },
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Float(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Int(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Int(i64::from(n))
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Float(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

/// Errors raised while writing a value into a draft.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field {field} expects {expected}, got {value:?}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        value: FieldValue,
    },
}

impl FieldError {
    pub fn mismatch(field: &str, expected: &'static str, value: FieldValue) -> Self {
        FieldError::TypeMismatch {
            field: field.to_string(),
            expected,
            value,
        }
    }
}

/// The editable projection of a resource, as held by the add/edit form.
///
/// `FIELDS` lists every tracked field; dirty detection compares exactly these.
/// `WRITE_ONLY` fields (passwords, PINs) are never read back from the stored record,
/// so any non-empty value in the draft counts as a change on its own.
pub trait FormFields: Clone + Default + Debug + Send + Sync + 'static {
    const FIELDS: &'static [&'static str];

    const WRITE_ONLY: &'static [&'static str] = &[];

    /// Read a field. `None` means the field is unknown or currently unset.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Write a field, converting from the UI representation where needed.
    fn set(&mut self, field: &str, value: FieldValue) -> Result<(), FieldError>;
}
