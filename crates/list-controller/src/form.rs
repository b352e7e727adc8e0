//! # Form State
//!
//! Owns the add/edit modal: which mode it is in, the record it was opened from, the
//! working draft, and the per-field validation messages.
//!
//! The lifecycle is one explicit state, `Closed | Creating | Editing`, instead of a
//! handful of open/close booleans per modal.

use crate::entity::Resource;
use crate::field::{FieldError, FieldValue, FormFields};
use crate::guard::MutationRequest;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Field name to the first validation message for that field.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Closed,
    Creating,
    Editing,
}

type CustomCheck = Arc<dyn Fn(Option<&FieldValue>) -> Option<String> + Send + Sync>;

/// A single validation rule for one field.
#[derive(Clone)]
pub enum Rule {
    Required,
    /// Required when creating; may stay empty when editing (passwords).
    RequiredOnCreate,
    MinLength(usize),
    MaxLength(usize),
    Email,
    /// Optional leading `+`, then only digits, between `min` and `max` of them.
    Digits { min: usize, max: usize },
    /// Must parse as a number greater than zero.
    Positive,
    Custom(CustomCheck),
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("Required"),
            Rule::RequiredOnCreate => f.write_str("RequiredOnCreate"),
            Rule::MinLength(n) => write!(f, "MinLength({n})"),
            Rule::MaxLength(n) => write!(f, "MaxLength({n})"),
            Rule::Email => f.write_str("Email"),
            Rule::Digits { min, max } => write!(f, "Digits({min}..={max})"),
            Rule::Positive => f.write_str("Positive"),
            Rule::Custom(_) => f.write_str("Custom"),
        }
    }
}

/// Caller-supplied validation rules, checked in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FormRules {
    rules: Vec<(String, Rule)>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, field: &str, rule: Rule) -> Self {
        self.rules.push((field.to_string(), rule));
        self
    }

    pub fn required(self, field: &str) -> Self {
        self.rule(field, Rule::Required)
    }

    pub fn length(self, field: &str, min: usize, max: usize) -> Self {
        self.rule(field, Rule::MinLength(min)).rule(field, Rule::MaxLength(max))
    }

    pub fn custom<F>(self, field: &str, check: F) -> Self
    where
        F: Fn(Option<&FieldValue>) -> Option<String> + Send + Sync + 'static,
    {
        self.rule(field, Rule::Custom(Arc::new(check)))
    }

    /// Validate `draft`; only the first failing rule per field is reported.
    pub fn check<D: FormFields>(&self, draft: &D, mode: FormMode) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for (field, rule) in &self.rules {
            if errors.contains_key(field) {
                continue;
            }
            let value = draft.get(field);
            if let Some(message) = check_rule(field, rule, value.as_ref(), mode) {
                errors.insert(field.clone(), message);
            }
        }
        errors
    }
}

fn check_rule(field: &str, rule: &Rule, value: Option<&FieldValue>, mode: FormMode) -> Option<String> {
    let present = value.filter(|v| !v.is_blank());
    match rule {
        Rule::Required => present.is_none().then(|| format!("{field} is required")),
        Rule::RequiredOnCreate => (mode == FormMode::Creating && present.is_none())
            .then(|| format!("{field} is required")),
        Rule::MinLength(min) => present
            .filter(|v| v.to_string().trim().chars().count() < *min)
            .map(|_| format!("{field} must be at least {min} characters")),
        Rule::MaxLength(max) => present
            .filter(|v| v.to_string().trim().chars().count() > *max)
            .map(|_| format!("{field} must be at most {max} characters")),
        Rule::Email => present
            .filter(|v| !looks_like_email(v.to_string().trim()))
            .map(|_| format!("{field} must be a valid email address")),
        Rule::Digits { min, max } => present
            .filter(|v| !is_digit_string(v.to_string().trim(), *min, *max))
            .map(|_| format!("{field} must contain {min} to {max} digits")),
        Rule::Positive => present
            .filter(|v| v.as_f64().map_or(true, |n| !(n > 0.0 && n.is_finite())))
            .map(|_| format!("{field} must be a positive number")),
        Rule::Custom(check) => check(value),
    }
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}

fn is_digit_string(s: &str, min: usize, max: usize) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    let count = digits.chars().count();
    count >= min && count <= max && digits.chars().all(|c| c.is_ascii_digit())
}

/// The open form: original record (edit mode only), working draft, and messages.
#[derive(Debug, Clone)]
pub struct FormDraft<R: Resource> {
    pub original: Option<R>,
    pub draft: R::Draft,
    pub errors: FieldErrors,
    pristine: Option<R::Draft>,
}

#[derive(Debug)]
pub struct FormStateController<R: Resource> {
    rules: FormRules,
    blank: R::Draft,
    current: Option<FormDraft<R>>,
    session: u64,
}

impl<R: Resource> FormStateController<R> {
    pub fn new(rules: FormRules) -> Self {
        Self::with_blank(rules, R::Draft::default())
    }

    /// Use `blank` as the starting draft in create mode.
    pub fn with_blank(rules: FormRules, blank: R::Draft) -> Self {
        Self {
            rules,
            blank,
            current: None,
            session: 0,
        }
    }

    pub fn set_blank(&mut self, blank: R::Draft) {
        self.blank = blank;
    }

    /// Open in create mode (`None`) or edit mode (`Some(record)`).
    ///
    /// Replaces whatever was open before.
    pub fn open(&mut self, resource: Option<&R>) {
        self.session += 1;
        self.current = Some(match resource {
            None => FormDraft {
                original: None,
                draft: self.blank.clone(),
                errors: FieldErrors::new(),
                pristine: None,
            },
            Some(record) => {
                let draft = record.to_draft();
                FormDraft {
                    original: Some(record.clone()),
                    pristine: Some(draft.clone()),
                    draft,
                    errors: FieldErrors::new(),
                }
            }
        });
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    /// Incremented on every `open`; lets async callers tell whether the form they
    /// started with is still the one on screen.
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn mode(&self) -> FormMode {
        match &self.current {
            None => FormMode::Closed,
            Some(form) if form.original.is_none() => FormMode::Creating,
            Some(_) => FormMode::Editing,
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&FormDraft<R>> {
        self.current.as_ref()
    }

    pub fn original(&self) -> Option<&R> {
        self.current.as_ref().and_then(|form| form.original.as_ref())
    }

    pub fn draft(&self) -> Option<&R::Draft> {
        self.current.as_ref().map(|form| &form.draft)
    }

    pub fn errors(&self) -> FieldErrors {
        self.current
            .as_ref()
            .map(|form| form.errors.clone())
            .unwrap_or_default()
    }

    /// Write one field and drop any message currently shown for it.
    ///
    /// Writing while closed is ignored.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        let Some(form) = self.current.as_mut() else {
            return Ok(());
        };
        form.draft.set(name, value)?;
        form.errors.remove(name);
        Ok(())
    }

    /// Run the rules, store the messages on the form, and return them.
    pub fn validate(&mut self) -> FieldErrors {
        let mode = self.mode();
        let Some(form) = self.current.as_mut() else {
            return FieldErrors::new();
        };
        form.errors = self.rules.check(&form.draft, mode);
        form.errors.clone()
    }

    /// Create mode is always dirty; edit mode is dirty iff a tracked field changed.
    pub fn is_dirty(&self) -> bool {
        !self.changed_fields().is_empty() || self.mode() == FormMode::Creating
    }

    /// Tracked fields whose draft value differs from the original record.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let Some(form) = &self.current else {
            return Vec::new();
        };
        let Some(pristine) = &form.pristine else {
            return Vec::new();
        };
        <R::Draft as FormFields>::FIELDS
            .iter()
            .copied()
            .filter(|field| {
                let now = form.draft.get(field);
                if <R::Draft as FormFields>::WRITE_ONLY.contains(field) {
                    now.is_some_and(|v| !v.is_blank())
                } else {
                    now != pristine.get(field)
                }
            })
            .collect()
    }

    /// The service call this form would make on submit.
    pub fn request(&self) -> Option<MutationRequest<R::Id, R::Draft>> {
        let form = self.current.as_ref()?;
        Some(match &form.original {
            None => MutationRequest::create(form.draft.clone()),
            Some(original) => MutationRequest::update(original.id().clone(), form.draft.clone()),
        })
    }
}
