//! # Filter Engine
//!
//! Derives the visible subset of a collection from a free-text search term and a set of
//! exact-match field filters. The engine is pure: it borrows the source and returns a new
//! sequence of references into it.

use crate::entity::Resource;
use crate::field::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Search term plus exact-match filters, as entered on a list page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search_term: String,
    pub field_equals: BTreeMap<String, FieldValue>,
}

impl FilterCriteria {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.field_equals.insert(field.into(), value.into());
        self
    }
}

/// Applies [`FilterCriteria`] against the configured searchable fields.
#[derive(Debug, Clone, Default)]
pub struct FilterEngine {
    searchable_fields: Vec<String>,
}

impl FilterEngine {
    pub fn new<I, S>(searchable_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            searchable_fields: searchable_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn searchable_fields(&self) -> &[String] {
        &self.searchable_fields
    }

    /// Filter `source` by every part of `criteria`.
    pub fn apply<'a, R: Resource>(&self, source: &'a [R], criteria: &FilterCriteria) -> Vec<&'a R> {
        self.apply_except(source, criteria, &[])
    }

    /// Filter `source`, skipping the `field_equals` entries named in `already_applied`.
    ///
    /// Used when `source` was already scoped by the service on those fields.
    pub fn apply_except<'a, R: Resource>(
        &self,
        source: &'a [R],
        criteria: &FilterCriteria,
        already_applied: &[String],
    ) -> Vec<&'a R> {
        let term = criteria.search_term.trim().to_lowercase();
        source
            .iter()
            .filter(|item| term.is_empty() || self.matches_search(*item, &term))
            .filter(|item| {
                criteria
                    .field_equals
                    .iter()
                    .filter(|(field, _)| !already_applied.iter().any(|f| f == *field))
                    .all(|(field, expected)| item.field(field).map_or(false, |v| v.matches(expected)))
            })
            .collect()
    }

    fn matches_search<R: Resource>(&self, item: &R, lowered_term: &str) -> bool {
        self.searchable_fields.iter().any(|field| {
            item.field(field)
                .map(|value| value.to_string().to_lowercase().contains(lowered_term))
                .unwrap_or(false)
        })
    }
}
