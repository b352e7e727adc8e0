//! # Estate Console Demo
//!
//! Starts the stores, seeds a few records, and drives the pages the way a user would:
//! search, page, add, double-click save, delete.
//!
//! The config path comes from `ESTATE_CONSOLE_CONFIG` (default `console.toml`).

use estate_console::model::{LeadDraft, PropertyDraft, RoleDraft, RoleId, UserDraft};
use estate_console::{setup_tracing, ConsoleConfig, ConsoleError, ConsolePages, ConsoleSystem};
use list_controller::{ListPageEvents, ResourceService, TracingNotifier};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};

async fn seed(system: &ConsoleSystem) -> Result<(), ConsoleError> {
    for (name, description) in [
        ("Admin", "Full access"),
        ("Agent", "Manages leads and listings"),
        ("Customer", "Buyers and tenants"),
    ] {
        system.role_client.create(RoleDraft::new(name, description)).await?;
    }

    let users = [
        ("Layla Nasser", "layla@estate.example", RoleId(1)),
        ("Karim Aziz", "karim@estate.example", RoleId(2)),
        ("John Carter", "john.carter@mail.example", RoleId(3)),
        ("Johanna Berg", "johanna@mail.example", RoleId(3)),
        ("Priya Raman", "priya@mail.example", RoleId(3)),
    ];
    for (name, email, role) in users {
        let draft = UserDraft::new(name, email, Some(role)).with_password("change-me-now");
        system.user_client.create(draft).await?;
    }

    for (name, phone, source) in [
        ("Omar Said", "0501234567", "Website"),
        ("Elena Petrova", "0559876543", "Referral"),
    ] {
        system.lead_client.create(LeadDraft::new(name, phone, source)).await?;
    }

    for n in 1..=12u32 {
        let (kind, bedrooms) = if n % 3 == 0 { ("Villa", 5) } else { ("Apartment", 2) };
        let draft = PropertyDraft::new(format!("{kind} {n}"), "Dubai", kind, 900_000.0 + f64::from(n) * 50_000.0)
            .with_bedrooms(bedrooms);
        system.property_client.create(draft).await?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    setup_tracing();

    let path = std::env::var("ESTATE_CONSOLE_CONFIG").unwrap_or_else(|_| "console.toml".to_string());
    let config = ConsoleConfig::load(&path)?;
    info!(%path, "Starting estate console");

    let system = ConsoleSystem::new(config.store_buffer);
    seed(&system).instrument(info_span!("seed")).await?;

    let pages = ConsolePages::open(&system, &config, Arc::new(TracingNotifier)).await?;

    // Properties: search and paging.
    let properties = &pages.properties;
    let view = properties.view();
    info!(total = view.total_items, pages = view.total_pages, "Properties loaded");
    properties.on_search_change("villa");
    let view = properties.view();
    info!(
        matches = view.total_items,
        first = ?view.items.first().map(|p| &p.title),
        "Searched for villas"
    );
    properties.on_search_change("");
    properties.on_page_change(2);
    let view = properties.view();
    info!(page = view.page, from = view.start_item, to = view.end_item, "Second page");

    // Leads: a double click on save creates one lead.
    let leads = &pages.leads;
    leads.on_add_new();
    leads.on_field_input("name", "Hassan Ali".into())?;
    leads.on_field_input("phone", "050 555 0199".into())?;
    leads.on_field_input("source", "Open house".into())?;
    let (first, second) = tokio::join!(leads.on_submit(), leads.on_submit());
    info!(
        saved = first?.is_some(),
        duplicate_ignored = second?.is_none(),
        total = leads.view().total_items,
        "Lead submitted twice"
    );

    // Customers: only users holding the customer role.
    let customers = &pages.customers;
    let view = customers.view();
    info!(count = view.total_items, role = %pages.customer_role, "Customers");
    customers.on_search_change("john");
    info!(count = customers.view().total_items, "Customers matching 'john'");

    // Users: a duplicate e-mail is rejected by the backend; the form stays open.
    let users = &pages.users;
    users.on_add_new();
    users.on_field_input("name", "Second Layla".into())?;
    users.on_field_input("email", "layla@estate.example".into())?;
    users.on_field_input("password", "another-pass".into())?;
    if let Err(e) = users.on_submit().await {
        warn!(error = %e, form = ?users.form_mode(), "User not saved");
    }
    users.on_cancel_form();

    // Properties: delete the first listing on the current page.
    if let Some(target) = properties.view().items.first().cloned() {
        properties.on_delete(&target)?;
        properties.on_confirm_delete().await?;
        info!(id = %target.id, remaining = properties.view().total_items, "Property deleted");
    }

    drop(pages);
    system.shutdown().await?;

    info!("Console demo completed");
    Ok(())
}
