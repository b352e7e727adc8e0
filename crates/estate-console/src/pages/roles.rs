use crate::model::Role;
use list_controller::{FormRules, ListConfig, ResourceListController, ResourceService};
use std::sync::Arc;

pub fn rules() -> FormRules {
    FormRules::new().required("name").length("name", 2, 40).length("description", 0, 200)
}

pub fn controller(
    service: Arc<dyn ResourceService<Role>>,
    config: &ListConfig,
) -> ResourceListController<Role> {
    ResourceListController::new("roles", service, config.clone(), rules())
}
