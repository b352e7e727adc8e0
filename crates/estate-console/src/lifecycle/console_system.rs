use crate::error::ConsoleError;
use crate::model::{Lead, Property, Role, User};
use list_controller::{ResourceStore, StoreClient};
use tracing::{error, info};

/// Owns the store tasks behind every console page.
///
/// # Example
///
/// ```ignore
/// let system = ConsoleSystem::new(32);
/// let pages = ConsolePages::open(&system, &config, notifier).await?;
/// // ... drive the pages ...
/// drop(pages);
/// system.shutdown().await?;
/// ```
pub struct ConsoleSystem {
    pub user_client: StoreClient<User>,
    pub role_client: StoreClient<Role>,
    pub lead_client: StoreClient<Lead>,
    pub property_client: StoreClient<Property>,

    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl ConsoleSystem {
    /// Spawn the stores. Must be called inside a tokio runtime.
    pub fn new(buffer_size: usize) -> Self {
        let (user_store, user_client) = ResourceStore::<User>::new(buffer_size);
        let (role_store, role_client) = ResourceStore::<Role>::new(buffer_size);
        let (lead_store, lead_client) = ResourceStore::<Lead>::new(buffer_size);
        let (property_store, property_client) = ResourceStore::<Property>::new(buffer_size);

        let handles = vec![
            tokio::spawn(user_store.run()),
            tokio::spawn(role_store.run()),
            tokio::spawn(lead_store.run()),
            tokio::spawn(property_store.run()),
        ];
        info!(stores = handles.len(), "Console system started");

        Self {
            user_client,
            role_client,
            lead_client,
            property_client,
            handles,
        }
    }

    /// Close every channel and wait for the stores to finish.
    pub async fn shutdown(self) -> Result<(), ConsoleError> {
        info!("Shutting down console system...");

        drop(self.user_client);
        drop(self.role_client);
        drop(self.lead_client);
        drop(self.property_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store task failed");
                return Err(ConsoleError::TaskFailed(e));
            }
        }

        info!("Console system shutdown complete.");
        Ok(())
    }
}
