//! User administration.

use crate::model::User;
use list_controller::{FormRules, ListConfig, ResourceListController, ResourceService, Rule};
use std::sync::Arc;

/// Shared by the users page and the customers page.
pub fn rules() -> FormRules {
    FormRules::new()
        .required("name")
        .length("name", 2, 60)
        .required("email")
        .rule("email", Rule::Email)
        .rule("phone", Rule::Digits { min: 7, max: 15 })
        .rule("password", Rule::RequiredOnCreate)
        .rule("password", Rule::MinLength(8))
}

pub fn controller(
    service: Arc<dyn ResourceService<User>>,
    config: &ListConfig,
) -> ResourceListController<User> {
    ResourceListController::new("users", service, config.clone(), rules())
}
