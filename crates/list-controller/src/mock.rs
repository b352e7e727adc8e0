//! # Mock Service & Testing Guide
//!
//! [`MockService<R>`] hands out an ordinary [`StoreClient<R>`] whose requests are answered
//! from a queue of expectations instead of a real store. Use it to drive a
//! [`ResourceListController`](crate::ResourceListController) through failure paths that
//! are awkward to provoke with a real backend: a network error on update, a failing
//! list, a slow delete.
//!
//! ## When to use the mock vs the store
//!
//! | | MockService | ResourceStore |
//! |---|---|---|
//! | **State** | none; replies are scripted | real collection |
//! | **Error injection** | `return_err` | only conflicts / not-found |
//! | **Call counting** | [`calls`](MockService::calls) | no |
//! | **Use case** | controller logic | end-to-end page flows |
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut mock = MockService::<Property>::new();
//! mock.expect_list().return_ok(vec![villa.clone()]);
//! mock.expect_update().return_err(ServiceError::Transport("connection reset".into()));
//!
//! let controller = ResourceListController::new("properties", Arc::new(mock.client()), config, rules);
//! controller.refresh().await?;
//! // ... exercise the controller ...
//! mock.verify();
//! ```
//!
//! Replies are sent from a background task, so every call suspends at least once. Two
//! calls issued back to back through `tokio::join!` therefore overlap the way two rapid
//! clicks do.

use crate::client::StoreClient;
use crate::entity::Resource;
use crate::error::ServiceError;
use crate::guard::MutationKind;
use crate::message::StoreRequest;
use crate::service::ListQuery;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

enum Expectation<R: Resource> {
    List(Result<Vec<R>, ServiceError>),
    Create(Result<R, ServiceError>),
    Update(Result<R, ServiceError>),
    Remove(Result<(), ServiceError>),
}

impl<R: Resource> Expectation<R> {
    fn label(&self) -> &'static str {
        match self {
            Expectation::List(_) => "list",
            Expectation::Create(_) => "create",
            Expectation::Update(_) => "update",
            Expectation::Remove(_) => "remove",
        }
    }
}

/// What the mock has been asked to do so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallLog {
    pub list: usize,
    pub create: usize,
    pub update: usize,
    pub remove: usize,
    /// The query passed to each `list`, in order.
    pub queries: Vec<Option<ListQuery>>,
}

impl CallLog {
    pub fn mutations(&self, kind: MutationKind) -> usize {
        match kind {
            MutationKind::Create => self.create,
            MutationKind::Update => self.update,
            MutationKind::Delete => self.remove,
        }
    }
}

struct Shared<R: Resource> {
    expectations: VecDeque<Expectation<R>>,
    calls: CallLog,
    unexpected: Vec<String>,
}

fn lock<R: Resource>(shared: &Mutex<Shared<R>>) -> MutexGuard<'_, Shared<R>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A scripted resource service. See the [module docs](self).
pub struct MockService<R: Resource> {
    client: StoreClient<R>,
    shared: Arc<Mutex<Shared<R>>>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<R: Resource> Default for MockService<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resource> MockService<R> {
    /// Must be called inside a tokio runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<StoreRequest<R>>(100);
        let shared = Arc::new(Mutex::new(Shared {
            expectations: VecDeque::new(),
            calls: CallLog::default(),
            unexpected: Vec::new(),
        }));
        let task_shared = shared.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let mut state = lock(&task_shared);
                let next = state.expectations.pop_front();
                match (request, next) {
                    (StoreRequest::List { query, respond_to }, Some(Expectation::List(reply))) => {
                        state.calls.list += 1;
                        state.calls.queries.push(query);
                        let _ = respond_to.send(reply);
                    }
                    (StoreRequest::Create { respond_to, .. }, Some(Expectation::Create(reply))) => {
                        state.calls.create += 1;
                        let _ = respond_to.send(reply);
                    }
                    (StoreRequest::Update { respond_to, .. }, Some(Expectation::Update(reply))) => {
                        state.calls.update += 1;
                        let _ = respond_to.send(reply);
                    }
                    (StoreRequest::Remove { respond_to, .. }, Some(Expectation::Remove(reply))) => {
                        state.calls.remove += 1;
                        let _ = respond_to.send(reply);
                    }
                    (request, next) => {
                        // Dropping the responder makes the caller see ServiceDropped.
                        let got = match request {
                            StoreRequest::List { .. } => "list",
                            StoreRequest::Create { .. } => "create",
                            StoreRequest::Update { .. } => "update",
                            StoreRequest::Remove { .. } => "remove",
                        };
                        let wanted = next.as_ref().map_or("nothing", Expectation::label);
                        state
                            .unexpected
                            .push(format!("got {got}, expected {wanted}"));
                        if let Some(next) = next {
                            state.expectations.push_front(next);
                        }
                    }
                }
            }
        });

        Self {
            client: StoreClient::new(sender),
            shared,
            _handle: handle,
        }
    }

    /// A client wired to this mock. Advertises remote filtering, like the store does.
    pub fn client(&self) -> StoreClient<R> {
        self.client.clone()
    }

    pub fn expect_list(&mut self) -> ExpectationBuilder<R, Vec<R>> {
        ExpectationBuilder::new(self.shared.clone(), Expectation::List)
    }

    pub fn expect_create(&mut self) -> ExpectationBuilder<R, R> {
        ExpectationBuilder::new(self.shared.clone(), Expectation::Create)
    }

    pub fn expect_update(&mut self) -> ExpectationBuilder<R, R> {
        ExpectationBuilder::new(self.shared.clone(), Expectation::Update)
    }

    pub fn expect_remove(&mut self) -> ExpectationBuilder<R, ()> {
        ExpectationBuilder::new(self.shared.clone(), Expectation::Remove)
    }

    pub fn calls(&self) -> CallLog {
        lock(&self.shared).calls.clone()
    }

    /// Panics if a request arrived out of script or an expectation was never used.
    pub fn verify(&self) {
        let state = lock(&self.shared);
        if !state.unexpected.is_empty() {
            panic!("Unexpected requests: {:?}", state.unexpected);
        }
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }
}

/// Queues one scripted reply.
pub struct ExpectationBuilder<R: Resource, T> {
    shared: Arc<Mutex<Shared<R>>>,
    wrap: fn(Result<T, ServiceError>) -> Expectation<R>,
}

impl<R: Resource, T> ExpectationBuilder<R, T> {
    fn new(shared: Arc<Mutex<Shared<R>>>, wrap: fn(Result<T, ServiceError>) -> Expectation<R>) -> Self {
        Self { shared, wrap }
    }

    pub fn return_ok(self, value: T) {
        lock(&self.shared).expectations.push_back((self.wrap)(Ok(value)));
    }

    pub fn return_err(self, error: ServiceError) {
        lock(&self.shared).expectations.push_back((self.wrap)(Err(error)));
    }
}
