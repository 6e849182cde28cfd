use crate::config::Credentials;
use crate::utils::CleanupError;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

#[cfg(test)]
pub mod memory;
pub mod user_store;

#[cfg(test)]
pub use memory::InMemoryUserStore;
pub use user_store::{UserStore, WriteBatch};

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Authenticates with the given credential and probes the database.
    /// Every failure here is a setup failure; nothing is retried.
    pub async fn new(credentials: &Credentials) -> Result<Self, CleanupError> {
        let db_name = credentials.database_name()?;

        let mut client_options = mongodb::options::ClientOptions::parse(&credentials.uri)
            .await
            .map_err(|e| CleanupError::Connection(e.to_string()))?;

        // One-shot run: a single connection is enough, fail fast if unreachable
        client_options.app_name = Some("profile-image-cleanup".to_string());
        client_options.max_pool_size = Some(1);
        client_options.connect_timeout = Some(Duration::from_secs(10));
        client_options.server_selection_timeout = Some(Duration::from_secs(10));

        let client = Client::with_options(client_options)
            .map_err(|e| CleanupError::Connection(e.to_string()))?;

        let db = client.database(&db_name);

        // Test connection (also surfaces authentication errors)
        db.list_collection_names()
            .await
            .map_err(|e| CleanupError::Connection(e.to_string()))?;

        log::info!("✅ Connected to MongoDB database: {}", db_name);

        Ok(Self { client, db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
