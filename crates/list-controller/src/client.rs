//! # Store Client
//!
//! The [`ResourceService`] implementation that talks to a [`ResourceStore`](crate::ResourceStore)
//! (or to a [`MockService`](crate::mock::MockService)) over a channel.

use crate::entity::Resource;
use crate::error::ServiceError;
use crate::message::StoreRequest;
use crate::service::{ListQuery, ResourceService};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

/// Cheap to clone: holds only the sender half of the channel.
pub struct StoreClient<R: Resource> {
    sender: mpsc::Sender<StoreRequest<R>>,
    remote_filter: bool,
}

impl<R: Resource> Clone for StoreClient<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            remote_filter: self.remote_filter,
        }
    }
}

impl<R: Resource> StoreClient<R> {
    pub fn new(sender: mpsc::Sender<StoreRequest<R>>) -> Self {
        Self {
            sender,
            remote_filter: true,
        }
    }

    /// Advertise no server-side filtering, like an endpoint without query parameters.
    /// Any query passed to `list` is dropped before it reaches the store.
    pub fn without_remote_filter(mut self) -> Self {
        self.remote_filter = false;
        self
    }

    async fn call<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<Result<T, ServiceError>>) -> StoreRequest<R>,
    ) -> Result<T, ServiceError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| ServiceError::ServiceClosed)?;
        response.await.map_err(|_| ServiceError::ServiceDropped)?
    }
}

#[async_trait]
impl<R: Resource> ResourceService<R> for StoreClient<R> {
    #[instrument(skip(self))]
    async fn list(&self, query: Option<&ListQuery>) -> Result<Vec<R>, ServiceError> {
        debug!("Sending request");
        let query = query.filter(|_| self.remote_filter).cloned();
        self.call(|respond_to| StoreRequest::List { query, respond_to })
            .await
    }

    #[instrument(skip(self, payload))]
    async fn create(&self, payload: R::Draft) -> Result<R, ServiceError> {
        debug!(?payload, "Sending request");
        self.call(|respond_to| StoreRequest::Create { payload, respond_to })
            .await
    }

    #[instrument(skip(self, payload))]
    async fn update(&self, id: R::Id, payload: R::Draft) -> Result<R, ServiceError> {
        debug!(?payload, "Sending request");
        self.call(|respond_to| StoreRequest::Update {
            id,
            payload,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: R::Id) -> Result<(), ServiceError> {
        debug!("Sending request");
        self.call(|respond_to| StoreRequest::Remove { id, respond_to })
            .await
    }

    fn supports_remote_filter(&self) -> bool {
        self.remote_filter
    }
}
