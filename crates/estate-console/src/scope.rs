//! Customer scoping.
//!
//! The customer page lists users holding the customer role. The role is either
//! configured by id or looked up by name; a failed lookup is an error, never a
//! silent fallback to some other id.

use crate::config::CustomerScope;
use crate::error::ScopeError;
use crate::model::{Role, RoleId};
use list_controller::{ListQuery, ResourceService};
use tracing::{info, warn};

pub async fn resolve_customer_role(
    scope: &CustomerScope,
    roles: &dyn ResourceService<Role>,
) -> Result<RoleId, ScopeError> {
    if let Some(id) = scope.role_id {
        info!(role_id = id, "Customer role from config");
        return Ok(RoleId(id));
    }

    let wanted = scope.role_name.trim();
    let query = ListQuery::new().with_field("name", wanted);
    let candidates = roles.list(Some(&query)).await?;
    // Remote scoping is exact; the name match here is not case-sensitive.
    let found = match candidates.iter().find(|role| role.name.eq_ignore_ascii_case(wanted)) {
        Some(role) => Some(role.id),
        None => roles
            .list(None)
            .await?
            .into_iter()
            .find(|role| role.name.eq_ignore_ascii_case(wanted))
            .map(|role| role.id),
    };

    match found {
        Some(id) => {
            info!(role = wanted, %id, "Customer role resolved");
            Ok(id)
        }
        None => {
            warn!(role = wanted, "Customer role not found");
            Err(ScopeError::RoleNotFound(wanted.to_string()))
        }
    }
}
