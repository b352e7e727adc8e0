//! Page event handlers.
//!
//! The presentation layer calls these in response to user input. They differ from the
//! controller's own methods in one way: a duplicate submit or delete is not an error
//! here, it is a no-op.

use crate::controller::ResourceListController;
use crate::entity::Resource;
use crate::error::ControllerError;
use crate::field::FieldValue;
use async_trait::async_trait;

#[async_trait]
pub trait ListPageEvents<R: Resource>: Send + Sync {
    fn on_search_change(&self, term: &str);

    async fn on_field_filter_change(
        &self,
        field: &str,
        value: Option<FieldValue>,
    ) -> Result<(), ControllerError>;

    /// Out-of-range pages are ignored.
    fn on_page_change(&self, page: usize);

    fn on_page_size_change(&self, page_size: usize);

    fn on_add_new(&self);

    fn on_edit(&self, resource: &R) -> Result<(), ControllerError>;

    fn on_field_input(&self, field: &str, value: FieldValue) -> Result<(), ControllerError>;

    fn on_cancel_form(&self);

    /// `Busy(Update)` while that record's update is still in flight.
    fn on_delete(&self, resource: &R) -> Result<(), ControllerError>;

    fn on_cancel_delete(&self);

    /// `Ok(None)` when a submit was already in flight.
    async fn on_submit(&self) -> Result<Option<R>, ControllerError>;

    /// `Ok(false)` when a delete was already in flight.
    async fn on_confirm_delete(&self) -> Result<bool, ControllerError>;
}

#[async_trait]
impl<R: Resource> ListPageEvents<R> for ResourceListController<R> {
    fn on_search_change(&self, term: &str) {
        self.set_search(term);
    }

    async fn on_field_filter_change(
        &self,
        field: &str,
        value: Option<FieldValue>,
    ) -> Result<(), ControllerError> {
        self.set_field_filter(field, value).await
    }

    fn on_page_change(&self, page: usize) {
        self.set_page(page);
    }

    fn on_page_size_change(&self, page_size: usize) {
        self.set_page_size(page_size);
    }

    fn on_add_new(&self) {
        self.open_create();
    }

    fn on_edit(&self, resource: &R) -> Result<(), ControllerError> {
        self.open_edit(resource)
    }

    fn on_field_input(&self, field: &str, value: FieldValue) -> Result<(), ControllerError> {
        self.set_field(field, value)
    }

    fn on_cancel_form(&self) {
        self.close_form();
    }

    fn on_delete(&self, resource: &R) -> Result<(), ControllerError> {
        self.remove(resource)
    }

    fn on_cancel_delete(&self) {
        self.cancel_delete();
    }

    async fn on_submit(&self) -> Result<Option<R>, ControllerError> {
        match self.submit().await {
            Ok(saved) => Ok(Some(saved)),
            Err(e) if e.is_busy() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn on_confirm_delete(&self) -> Result<bool, ControllerError> {
        match self.confirm_delete().await {
            Ok(()) => Ok(true),
            Err(e) if e.is_busy() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
