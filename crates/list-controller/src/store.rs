//! # In-Process Resource Store
//!
//! [`ResourceStore`] is a task that owns one collection and answers
//! [`StoreRequest`]s sequentially. It stands in for the backend behind a management
//! page: it generates IDs, rejects conflicting records, and applies server-side scoping
//! on `list`.

use crate::client::StoreClient;
use crate::entity::StoredResource;
use crate::error::ServiceError;
use crate::message::StoreRequest;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Owns a collection of `R` and the receiving end of its request channel.
///
/// Requests are handled one at a time, so the collection needs no lock. Records keep
/// insertion order, which is the order `list` returns them in.
pub struct ResourceStore<R: StoredResource>
where
    R::Id: From<u32>,
{
    receiver: mpsc::Receiver<StoreRequest<R>>,
    items: Vec<R>,
    next_id: u32,
}

impl<R: StoredResource> ResourceStore<R>
where
    R::Id: From<u32>,
{
    /// Create a store and a client for it. The store does nothing until [`run`](Self::run).
    pub fn new(buffer_size: usize) -> (Self, StoreClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            items: Vec::new(),
            next_id: 1,
        };
        (store, StoreClient::new(sender))
    }

    /// Process requests until every client has been dropped.
    pub async fn run(mut self) {
        let resource = std::any::type_name::<R>()
            .rsplit("::")
            .next()
            .unwrap_or("Unknown");
        info!(resource, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::List { query, respond_to } => {
                    let items: Vec<R> = match &query {
                        Some(query) => self
                            .items
                            .iter()
                            .filter(|item| query.matches(*item))
                            .cloned()
                            .collect(),
                        None => self.items.clone(),
                    };
                    debug!(resource, ?query, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                StoreRequest::Create { payload, respond_to } => {
                    debug!(resource, ?payload, "Create");
                    let id = R::Id::from(self.next_id);
                    let result = R::from_draft(id, payload)
                        .map_err(|e| ServiceError::Rejected(Box::new(e)))
                        .and_then(|item| {
                            match self.items.iter().find(|other| item.conflicts_with(other)) {
                                Some(other) => Err(ServiceError::Conflict(other.id().to_string())),
                                None => Ok(item),
                            }
                        });
                    match result {
                        Ok(item) => {
                            self.next_id += 1;
                            self.items.push(item.clone());
                            info!(resource, id = %item.id(), size = self.items.len(), "Created");
                            let _ = respond_to.send(Ok(item));
                        }
                        Err(e) => {
                            warn!(resource, error = %e, "Create failed");
                            let _ = respond_to.send(Err(e));
                        }
                    }
                }
                StoreRequest::Update { id, payload, respond_to } => {
                    debug!(resource, %id, ?payload, "Update");
                    let result = self.update(&id, payload);
                    match &result {
                        Ok(_) => info!(resource, %id, "Updated"),
                        Err(e) => warn!(resource, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Remove { id, respond_to } => {
                    debug!(resource, %id, "Remove");
                    match self.items.iter().position(|item| item.id() == &id) {
                        Some(index) => {
                            self.items.remove(index);
                            info!(resource, %id, size = self.items.len(), "Removed");
                            let _ = respond_to.send(Ok(()));
                        }
                        None => {
                            warn!(resource, %id, "Not found");
                            let _ = respond_to.send(Err(ServiceError::NotFound(id.to_string())));
                        }
                    }
                }
            }
        }

        info!(resource, size = self.items.len(), "Shutdown");
    }

    fn update(&mut self, id: &R::Id, payload: R::Draft) -> Result<R, ServiceError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        // Apply to a copy so a rejected update leaves the stored record untouched.
        let mut updated = self.items[index].clone();
        updated
            .apply_draft(payload)
            .map_err(|e| ServiceError::Rejected(Box::new(e)))?;
        if let Some(other) = self
            .items
            .iter()
            .find(|other| other.id() != id && updated.conflicts_with(other))
        {
            return Err(ServiceError::Conflict(other.id().to_string()));
        }
        self.items[index] = updated.clone();
        Ok(updated)
    }
}
