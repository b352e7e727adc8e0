//! # List Controller
//!
//! Building blocks for "list + search + paginate + create/edit modal + delete confirm"
//! management pages. One [`ResourceListController`] per page composes the pieces below
//! over any [`Resource`] type.
//!
//! ## Architecture Overview
//!
//! 1. **Resource Layer** ([`Resource`], [`FormFields`]) - how records expose their fields
//!    and how drafts are read and written by name
//! 2. **Logic Layer** ([`FilterEngine`], [`PaginationController`], [`FormStateController`],
//!    [`MutationGuard`]) - synchronous, side-effect free state machines
//! 3. **Service Layer** ([`ResourceService`]) - the async data source. [`ResourceStore`] is
//!    an in-memory actor implementing it through [`StoreClient`]; [`MockService`] scripts it
//!    for tests.
//!
//! ## Data Flow
//!
//! ```text
//! service.list ──> source ──> FilterEngine ──> filtered ──> PaginationController ──> page
//!                    ^                                                                 │
//!                    └──────────── refresh after create / update / delete ─────────────┘
//! ```
//!
//! The filtered collection and the page are recomputed from the source on every read.
//! Mutations never patch the source; the controller always goes back to the service.
//!
//! ## Example
//!
//! ```rust,ignore
//! let (store, client) = ResourceStore::<Lead>::new(32);
//! tokio::spawn(store.run());
//!
//! let leads = ResourceListController::new(
//!     "leads",
//!     Arc::new(client),
//!     ListConfig::searching(["name", "email", "phone"]),
//!     FormRules::new().required("name").rule("email", Rule::Email),
//! );
//! leads.refresh().await?;
//!
//! leads.open_create();
//! leads.set_field("name", "Ada Lovelace".into())?;
//! leads.set_field("email", "ada@example.com".into())?;
//! let saved = leads.submit().await?;
//! ```
//!
//! ## Testing
//!
//! [`MockService`] answers requests from a queue of scripted replies and counts calls, so
//! double-submit and failure paths can be asserted without a backend. See the [`mock`]
//! module.

pub mod client;
pub mod config;
pub mod controller;
pub mod entity;
pub mod error;
pub mod events;
pub mod field;
pub mod filter;
pub mod form;
pub mod guard;
pub mod message;
pub mod mock;
pub mod notify;
pub mod pagination;
pub mod service;
pub mod store;

pub use client::StoreClient;
pub use config::{ListConfig, DEFAULT_PAGE_SIZE};
pub use controller::{ListView, ResourceListController, SourceMode};
pub use entity::{Resource, StoredResource};
pub use error::{ControllerError, ServiceError};
pub use events::ListPageEvents;
pub use field::{FieldError, FieldValue, FormFields};
pub use filter::{FilterCriteria, FilterEngine};
pub use form::{FieldErrors, FormDraft, FormMode, FormRules, FormStateController, Rule};
pub use guard::{GuardError, MutationGuard, MutationKind, MutationRequest};
pub use message::{Response, StoreRequest};
pub use mock::{CallLog, MockService};
pub use notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
pub use pagination::{Page, PageState, PaginationController};
pub use service::{ListQuery, ResourceService};
pub use store::ResourceStore;
