use crate::model::Lead;
use list_controller::{FieldValue, FormRules, ListConfig, ResourceListController, ResourceService, Rule};
use std::sync::Arc;

/// Phone numbers are typed with spaces and dashes; only the digits are counted.
fn phone_digits(value: Option<&FieldValue>) -> Option<String> {
    let raw = value.map(ToString::to_string).unwrap_or_default();
    if raw.trim().is_empty() {
        return None;
    }
    let digits = raw.chars().filter(char::is_ascii_digit).count();
    let stray = raw
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')' | '+')));
    (stray || !(7..=15).contains(&digits)).then(|| "phone must contain 7 to 15 digits".to_string())
}

pub fn rules() -> FormRules {
    FormRules::new()
        .required("name")
        .length("name", 2, 80)
        .rule("email", Rule::Email)
        .custom("phone", phone_digits)
        .length("source", 0, 40)
}

pub fn controller(
    service: Arc<dyn ResourceService<Lead>>,
    config: &ListConfig,
) -> ResourceListController<Lead> {
    ResourceListController::new("leads", service, config.clone(), rules())
}
