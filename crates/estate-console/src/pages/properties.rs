use crate::model::Property;
use list_controller::{FormRules, ListConfig, ResourceListController, ResourceService, Rule};
use std::sync::Arc;

pub fn rules() -> FormRules {
    FormRules::new()
        .required("title")
        .length("title", 3, 120)
        .required("city")
        .rule("price", Rule::Positive)
}

pub fn controller(
    service: Arc<dyn ResourceService<Property>>,
    config: &ListConfig,
) -> ResourceListController<Property> {
    ResourceListController::new("properties", service, config.clone(), rules())
}
