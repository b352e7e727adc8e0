//! # Console Pages
//!
//! One [`ResourceListController`] per management screen, with that screen's form rules.
//! [`ConsolePages::open`] wires them to the running stores and loads every collection.

pub mod customers;
pub mod leads;
pub mod properties;
pub mod roles;
pub mod users;

use crate::config::ConsoleConfig;
use crate::error::ConsoleError;
use crate::lifecycle::ConsoleSystem;
use crate::model::{Lead, Property, Role, RoleId, User};
use crate::scope::resolve_customer_role;
use list_controller::{Notifier, ResourceListController};
use std::sync::Arc;
use tracing::info;

pub struct ConsolePages {
    pub users: ResourceListController<User>,
    pub customers: ResourceListController<User>,
    pub roles: ResourceListController<Role>,
    pub leads: ResourceListController<Lead>,
    pub properties: ResourceListController<Property>,
    pub customer_role: RoleId,
}

impl ConsolePages {
    /// Build every page and fetch its collection.
    ///
    /// Fails if the customer role cannot be resolved or any initial fetch fails.
    pub async fn open(
        system: &ConsoleSystem,
        config: &ConsoleConfig,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ConsoleError> {
        let customer_role = resolve_customer_role(&config.customers, &system.role_client).await?;

        let pages = Self {
            users: users::controller(Arc::new(system.user_client.clone()), &config.users)
                .with_notifier(notifier.clone()),
            customers: customers::controller(
                Arc::new(system.user_client.clone()),
                &config.users,
                customer_role,
            )
            .with_notifier(notifier.clone()),
            roles: roles::controller(Arc::new(system.role_client.clone()), &config.roles)
                .with_notifier(notifier.clone()),
            leads: leads::controller(Arc::new(system.lead_client.clone()), &config.leads)
                .with_notifier(notifier.clone()),
            properties: properties::controller(
                Arc::new(system.property_client.clone()),
                &config.properties,
            )
            .with_notifier(notifier),
            customer_role,
        };

        let (users, customers, roles, leads, properties) = tokio::join!(
            pages.users.refresh(),
            pages.customers.refresh(),
            pages.roles.refresh(),
            pages.leads.refresh(),
            pages.properties.refresh(),
        );
        users?;
        customers?;
        roles?;
        leads?;
        properties?;

        info!(%customer_role, "Console pages ready");
        Ok(pages)
    }
}
