//! # Store Messages
//!
//! Requests sent from a [`StoreClient`](crate::StoreClient) to a
//! [`ResourceStore`](crate::ResourceStore) task. Each carries a oneshot sender for the
//! reply.

use crate::entity::Resource;
use crate::error::ServiceError;
use crate::service::ListQuery;
use tokio::sync::oneshot;

/// Reply channel for one request.
pub type Response<T> = oneshot::Sender<Result<T, ServiceError>>;

/// The four operations of [`ResourceService`](crate::ResourceService), as messages.
#[derive(Debug)]
pub enum StoreRequest<R: Resource> {
    List {
        query: Option<ListQuery>,
        respond_to: Response<Vec<R>>,
    },
    Create {
        payload: R::Draft,
        respond_to: Response<R>,
    },
    Update {
        id: R::Id,
        payload: R::Draft,
        respond_to: Response<R>,
    },
    Remove {
        id: R::Id,
        respond_to: Response<()>,
    },
}
