//! # Resource List Controller
//!
//! The one object a management page needs. It owns the authoritative collection and
//! wires together the [`FilterEngine`], the [`PaginationController`], the
//! [`FormStateController`], and two [`MutationGuard`]s (submit and delete).
//!
//! ## Read model
//!
//! [`view`](ResourceListController::view) returns the current page of the filtered
//! collection plus everything the pagination bar, the modal, and the delete dialog need.
//!
//! ## Write model
//!
//! `open_create`, `open_edit`, `submit`, `remove`, `confirm_delete`. Mutations go through
//! the injected [`ResourceService`]; the local collection is never patched. After every
//! successful mutation the collection is fetched again.
//!
//! Submits and deletions have separate guards, so saving one record does not block
//! deleting another. Deleting the record whose update is still in flight is refused.
//!
//! ## Source modes
//!
//! When the service supports server-side scoping and a field filter is configured as a
//! remote filter field, changing that filter re-queries the service. The returned
//! collection is already scoped on those fields, so local filtering skips them and only
//! applies the search term and the remaining field filters.
//!
//! All methods take `&self`; the state sits behind a mutex that is never held across an
//! await, so overlapping calls (a double click on "Save") interleave the same way they
//! would in the browser.

use crate::config::ListConfig;
use crate::entity::Resource;
use crate::error::{ControllerError, ServiceError};
use crate::field::FieldValue;
use crate::filter::{FilterCriteria, FilterEngine};
use crate::form::{FieldErrors, FormMode, FormRules, FormStateController};
use crate::guard::{GuardError, MutationGuard, MutationKind, MutationRequest};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::pagination::PaginationController;
use crate::service::{ListQuery, ResourceService};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Where the current collection came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceMode {
    /// Full collection; every filter is applied locally.
    Local,
    /// Collection scoped by the service on `applied`; those filters are not reapplied.
    RemoteFiltered { applied: Vec<String> },
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone)]
pub struct ListView<R: Resource> {
    pub items: Vec<R>,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub start_item: usize,
    pub end_item: usize,
    pub is_loading: bool,
    pub form_mode: FormMode,
    pub pending_delete: Option<R>,
}

struct ListState<R: Resource> {
    source: Vec<R>,
    mode: SourceMode,
    criteria: FilterCriteria,
    pager: PaginationController,
    form: FormStateController<R>,
    pending_delete: Option<R>,
    is_loading: bool,
    fetch_seq: u64,
    /// Target of the submit currently in flight, if it is an update.
    updating: Option<R::Id>,
}

pub struct ResourceListController<R: Resource> {
    name: String,
    service: Arc<dyn ResourceService<R>>,
    notifier: Arc<dyn Notifier>,
    engine: FilterEngine,
    config: ListConfig,
    state: Mutex<ListState<R>>,
    submit_guard: MutationGuard,
    delete_guard: MutationGuard,
}

impl<R: Resource> ResourceListController<R> {
    /// Build a controller. Nothing is fetched until [`refresh`](Self::refresh).
    pub fn new(
        name: impl Into<String>,
        service: Arc<dyn ResourceService<R>>,
        config: ListConfig,
        rules: FormRules,
    ) -> Self {
        if config.page_size == 0 {
            warn!("page_size 0 is invalid, using 1");
        }
        let state = ListState {
            source: Vec::new(),
            mode: SourceMode::Local,
            criteria: FilterCriteria::default(),
            pager: PaginationController::new(config.page_size),
            form: FormStateController::new(rules),
            pending_delete: None,
            is_loading: false,
            fetch_seq: 0,
            updating: None,
        };
        Self {
            name: name.into(),
            service,
            notifier: Arc::new(TracingNotifier),
            engine: FilterEngine::new(config.searchable_fields.iter().cloned()),
            config,
            state: Mutex::new(state),
            submit_guard: MutationGuard::new("submit"),
            delete_guard: MutationGuard::new("delete"),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Starting draft for the create form, instead of `Draft::default()`.
    pub fn with_blank_draft(mut self, blank: R::Draft) -> Self {
        self.state_mut().form.set_blank(blank);
        self
    }

    /// Preset a field filter before the first fetch, e.g. a page that only ever shows
    /// one role's users.
    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.state_mut()
            .criteria
            .field_equals
            .insert(field.into(), value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn state_mut(&mut self) -> &mut ListState<R> {
        self.state
            .get_mut()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, ListState<R>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -------------------------------------------------------------------------
    // Fetching
    // -------------------------------------------------------------------------

    /// Fetch the authoritative collection, scoped remotely where possible.
    ///
    /// On failure the previous collection stays in place. `is_loading` is cleared either
    /// way. If another fetch started meanwhile, this result is discarded.
    pub async fn refresh(&self) -> Result<(), ControllerError> {
        let (seq, query) = {
            let mut st = self.lock();
            st.fetch_seq += 1;
            st.is_loading = true;
            (st.fetch_seq, self.remote_query(&st.criteria))
        };
        debug!(resource = %self.name, seq, ?query, "Fetching");

        let result = self.service.list(query.as_ref()).await;

        let mut st = self.lock();
        if st.fetch_seq != seq {
            debug!(resource = %self.name, seq, latest = st.fetch_seq, "Discarding superseded fetch");
            return Ok(());
        }
        st.is_loading = false;
        match result {
            Ok(items) => {
                st.source = items;
                st.mode = match query {
                    Some(query) => SourceMode::RemoteFiltered {
                        applied: query.field_equals.into_keys().collect(),
                    },
                    None => SourceMode::Local,
                };
                self.reconcile(&mut st);
                self.drop_stale_references(&mut st);
                info!(
                    resource = %self.name,
                    count = st.source.len(),
                    visible = st.pager.total_items(),
                    "Fetched"
                );
                Ok(())
            }
            Err(error) => {
                drop(st);
                warn!(resource = %self.name, %error, "Fetch failed");
                self.notifier.notify(Notification::FetchFailed {
                    resource: self.name.clone(),
                    message: error.to_string(),
                });
                Err(ControllerError::Fetch(error))
            }
        }
    }

    fn remote_query(&self, criteria: &FilterCriteria) -> Option<ListQuery> {
        if !self.service.supports_remote_filter() {
            return None;
        }
        let field_equals: std::collections::BTreeMap<_, _> = criteria
            .field_equals
            .iter()
            .filter(|(field, _)| self.config.is_remote_field(field))
            .map(|(field, value)| (field.clone(), value.clone()))
            .collect();
        (!field_equals.is_empty()).then_some(ListQuery { field_equals })
    }

    fn visible<'a>(&self, source: &'a [R], mode: &SourceMode, criteria: &FilterCriteria) -> Vec<&'a R> {
        match mode {
            SourceMode::Local => self.engine.apply(source, criteria),
            SourceMode::RemoteFiltered { applied } => {
                self.engine.apply_except(source, criteria, applied)
            }
        }
    }

    fn reconcile(&self, st: &mut ListState<R>) {
        let len = self.visible(&st.source, &st.mode, &st.criteria).len();
        st.pager.reconcile(len);
    }

    /// Close the edit form or delete dialog if their record left the collection.
    fn drop_stale_references(&self, st: &mut ListState<R>) {
        if let Some(original) = st.form.original() {
            let id = original.id();
            if !st.source.iter().any(|item| item.id() == id) {
                warn!(resource = %self.name, %id, "Edited record disappeared, closing form");
                st.form.close();
            }
        }
        if let Some(pending) = &st.pending_delete {
            let id = pending.id();
            if !st.source.iter().any(|item| item.id() == id) {
                debug!(resource = %self.name, %id, "Pending delete target gone");
                st.pending_delete = None;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Read model
    // -------------------------------------------------------------------------

    pub fn view(&self) -> ListView<R> {
        let mut guard = self.lock();
        let st = &mut *guard;
        let filtered = self.visible(&st.source, &st.mode, &st.criteria);
        let page = st.pager.slice(&filtered);
        ListView {
            items: page.items.into_iter().cloned().collect(),
            page: page.page,
            page_size: st.pager.page_size(),
            total_pages: page.total_pages,
            total_items: page.total_items,
            start_item: st.pager.start_item(),
            end_item: st.pager.end_item(),
            is_loading: st.is_loading,
            form_mode: st.form.mode(),
            pending_delete: st.pending_delete.clone(),
        }
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.lock().criteria.clone()
    }

    pub fn source_mode(&self) -> SourceMode {
        self.lock().mode.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn page(&self) -> usize {
        self.lock().pager.page()
    }

    // -------------------------------------------------------------------------
    // Filtering & paging
    // -------------------------------------------------------------------------

    pub fn set_search(&self, term: &str) {
        let mut st = self.lock();
        st.criteria.search_term = term.to_string();
        self.reconcile(&mut st);
    }

    /// Set (`Some`) or clear (`None`) an exact-match filter.
    ///
    /// Remote filter fields trigger a re-query; everything else filters locally. If the
    /// re-query fails the previous filter value is restored, so the criteria keep
    /// describing the collection on screen.
    pub async fn set_field_filter(
        &self,
        field: &str,
        value: Option<FieldValue>,
    ) -> Result<(), ControllerError> {
        let previous = {
            let mut st = self.lock();
            let previous = match &value {
                Some(value) => st
                    .criteria
                    .field_equals
                    .insert(field.to_string(), value.clone()),
                None => st.criteria.field_equals.remove(field),
            };
            let remote = self.service.supports_remote_filter() && self.config.is_remote_field(field);
            if !remote {
                self.reconcile(&mut st);
                return Ok(());
            }
            previous
        };

        let result = self.refresh().await;
        if result.is_err() {
            let mut st = self.lock();
            // Only roll back if nobody changed this filter while the fetch ran.
            if st.criteria.field_equals.get(field) == value.as_ref() {
                debug!(resource = %self.name, field, "Re-query failed, restoring filter");
                match previous {
                    Some(previous) => {
                        st.criteria.field_equals.insert(field.to_string(), previous);
                    }
                    None => {
                        st.criteria.field_equals.remove(field);
                    }
                }
                self.reconcile(&mut st);
            }
        }
        result
    }

    /// Returns whether the page changed.
    pub fn set_page(&self, n: usize) -> bool {
        let mut st = self.lock();
        let accepted = st.pager.set_page(n);
        if !accepted {
            debug!(resource = %self.name, requested = n, total = st.pager.total_pages(), "Ignoring out-of-range page");
        }
        accepted
    }

    pub fn set_page_size(&self, n: usize) {
        let mut st = self.lock();
        st.pager.set_page_size(n);
        self.reconcile(&mut st);
    }

    // -------------------------------------------------------------------------
    // Form
    // -------------------------------------------------------------------------

    /// Open the add form. Any pending delete dialog is dismissed.
    pub fn open_create(&self) {
        let mut st = self.lock();
        st.pending_delete = None;
        st.form.open(None);
    }

    /// Open the edit form for a record of the current collection.
    pub fn open_edit(&self, resource: &R) -> Result<(), ControllerError> {
        let mut st = self.lock();
        let current = st
            .source
            .iter()
            .find(|item| item.id() == resource.id())
            .cloned()
            .ok_or_else(|| ControllerError::StaleRecord(resource.id().to_string()))?;
        st.pending_delete = None;
        st.form.open(Some(&current));
        Ok(())
    }

    pub fn close_form(&self) {
        self.lock().form.close();
    }

    pub fn set_field(&self, name: &str, value: FieldValue) -> Result<(), ControllerError> {
        self.lock().form.set_field(name, value)?;
        Ok(())
    }

    pub fn form_mode(&self) -> FormMode {
        self.lock().form.mode()
    }

    pub fn form_errors(&self) -> FieldErrors {
        self.lock().form.errors()
    }

    pub fn draft(&self) -> Option<R::Draft> {
        self.lock().form.draft().cloned()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().form.is_dirty()
    }

    /// Whether the save button should be enabled.
    pub fn can_save(&self) -> bool {
        let st = self.lock();
        st.form.is_open() && st.form.is_dirty() && !self.submit_guard.is_busy()
    }

    /// Validate and send the open form to the service.
    ///
    /// On success the form closes and the collection is fetched again. On failure the
    /// form stays open with the user's input, and the collection is left as it was.
    pub async fn submit(&self) -> Result<R, ControllerError> {
        let (request, session) = {
            let mut st = self.lock();
            let request = st.form.request().ok_or(ControllerError::FormClosed)?;
            if self.submit_guard.is_busy() {
                debug!(resource = %self.name, kind = %request.kind, "Submit already in flight");
                return Err(ControllerError::Busy(request.kind));
            }
            let errors = st.form.validate();
            if !errors.is_empty() {
                debug!(resource = %self.name, ?errors, "Validation failed");
                return Err(ControllerError::Validation(errors));
            }
            if !st.form.is_dirty() {
                return Err(ControllerError::NotDirty);
            }
            st.updating = request.target_id.clone();
            (request, st.form.session())
        };

        let kind = request.kind;
        let service = Arc::clone(&self.service);
        let outcome = self
            .submit_guard
            .run(request, |req| async move {
                match (req.target_id, req.payload) {
                    (Some(id), Some(payload)) => service.update(id, payload).await,
                    (None, Some(payload)) => service.create(payload).await,
                    (_, None) => Err(ServiceError::Rejected("submit without payload".into())),
                }
            })
            .await;
        if !matches!(outcome, Err(GuardError::Busy(_))) {
            self.lock().updating = None;
        }

        match outcome {
            Err(GuardError::Busy(kind)) => Err(ControllerError::Busy(kind)),
            Err(GuardError::Failed(source)) => {
                warn!(resource = %self.name, %kind, error = %source, "Submit failed");
                self.notifier.notify(Notification::MutationFailed {
                    resource: self.name.clone(),
                    kind,
                    message: source.to_string(),
                });
                Err(ControllerError::Mutation { kind, source })
            }
            Ok(saved) => {
                {
                    let mut st = self.lock();
                    if st.form.session() == session {
                        st.form.close();
                    }
                }
                info!(resource = %self.name, %kind, id = %saved.id(), "Saved");
                self.notifier.notify(Notification::Saved {
                    resource: self.name.clone(),
                    kind,
                });
                // A failed re-fetch is already reported; the save itself succeeded.
                let _ = self.refresh().await;
                Ok(saved)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Deletion
    // -------------------------------------------------------------------------

    /// Fails with `Busy(Update)` while an update of `id` is in flight. An update and a
    /// delete of the same record never run together.
    fn check_not_updating(&self, st: &ListState<R>, id: &R::Id) -> Result<(), ControllerError> {
        if self.submit_guard.is_busy() && st.updating.as_ref() == Some(id) {
            debug!(resource = %self.name, %id, "Update in flight, refusing delete");
            return Err(ControllerError::Busy(MutationKind::Update));
        }
        Ok(())
    }

    /// Ask for confirmation before deleting `resource`. Closes any open form.
    pub fn remove(&self, resource: &R) -> Result<(), ControllerError> {
        let mut st = self.lock();
        self.check_not_updating(&st, resource.id())?;
        let current = st
            .source
            .iter()
            .find(|item| item.id() == resource.id())
            .cloned()
            .ok_or_else(|| ControllerError::StaleRecord(resource.id().to_string()))?;
        st.form.close();
        st.pending_delete = Some(current);
        Ok(())
    }

    pub fn cancel_delete(&self) {
        self.lock().pending_delete = None;
    }

    pub fn pending_delete(&self) -> Option<R> {
        self.lock().pending_delete.clone()
    }

    /// Delete the record awaiting confirmation.
    ///
    /// The dialog stays open on failure so the user can retry.
    pub async fn confirm_delete(&self) -> Result<(), ControllerError> {
        let target = {
            let st = self.lock();
            let target = st
                .pending_delete
                .as_ref()
                .map(|item| item.id().clone())
                .ok_or(ControllerError::NothingToDelete)?;
            self.check_not_updating(&st, &target)?;
            target
        };

        let service = Arc::clone(&self.service);
        let id = target.clone();
        let outcome = self
            .delete_guard
            .run(
                MutationRequest::<R::Id, R::Draft>::delete(target.clone()),
                |_| async move { service.remove(id).await },
            )
            .await;

        match outcome {
            Err(GuardError::Busy(kind)) => {
                debug!(resource = %self.name, id = %target, "Delete already in flight");
                Err(ControllerError::Busy(kind))
            }
            Err(GuardError::Failed(source)) => {
                warn!(resource = %self.name, id = %target, error = %source, "Delete failed");
                self.notifier.notify(Notification::MutationFailed {
                    resource: self.name.clone(),
                    kind: MutationKind::Delete,
                    message: source.to_string(),
                });
                Err(ControllerError::Mutation {
                    kind: MutationKind::Delete,
                    source,
                })
            }
            Ok(()) => {
                {
                    let mut st = self.lock();
                    if st.pending_delete.as_ref().map(|item| item.id()) == Some(&target) {
                        st.pending_delete = None;
                    }
                }
                info!(resource = %self.name, id = %target, "Deleted");
                self.notifier.notify(Notification::Deleted {
                    resource: self.name.clone(),
                });
                let _ = self.refresh().await;
                Ok(())
            }
        }
    }
}
