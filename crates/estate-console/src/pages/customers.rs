//! Customers are users holding the customer role.
//!
//! The page is the users page with a fixed `role_id` filter. When the service can scope
//! on `role_id`, only customers are ever fetched.

use crate::model::{RoleId, User, UserDraft};
use crate::pages::users;
use list_controller::{ListConfig, ResourceListController, ResourceService};
use std::sync::Arc;

pub fn controller(
    service: Arc<dyn ResourceService<User>>,
    config: &ListConfig,
    customer_role: RoleId,
) -> ResourceListController<User> {
    let mut config = config.clone();
    if !config.is_remote_field("role_id") {
        config = config.with_remote_filter("role_id");
    }
    ResourceListController::new("customers", service, config, users::rules())
        .with_filter("role_id", customer_role)
        .with_blank_draft(UserDraft::new("", "", Some(customer_role)))
}
