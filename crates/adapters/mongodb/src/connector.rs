//! MongoDB connector.

use async_trait::async_trait;
use imaginify_core::error::{SyncError, SyncResult};
use imaginify_core::traits::Connector;
use mongodb::bson::doc;
use mongodb::{Client, Database};

/// Database used when none is configured.
pub const DEFAULT_DATABASE_NAME: &str = "imaginify";

/// Opens a handle to the configured MongoDB database.
///
/// The URL is optional at construction so that a missing value surfaces as a
/// configuration error on first use rather than at startup.
#[derive(Debug, Clone)]
pub struct MongoConnector {
    url: Option<String>,
    database: String,
}

impl MongoConnector {
    /// Creates a connector for the given URL and database name.
    pub fn new(url: Option<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.filter(|u| !u.trim().is_empty()),
            database: database.into(),
        }
    }

    /// Reads `MONGODB_URL` (falling back to `MONGOOSE_URL`) and
    /// `MONGODB_DB_NAME` from the environment.
    pub fn from_env() -> Self {
        let url = std::env::var("MONGODB_URL")
            .or_else(|_| std::env::var("MONGOOSE_URL"))
            .ok();
        let database =
            std::env::var("MONGODB_DB_NAME").unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string());
        Self::new(url, database)
    }

    /// Returns the configured database name.
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Returns true when a connection URL is configured.
    pub fn has_url(&self) -> bool {
        self.url.is_some()
    }
}

#[async_trait]
impl Connector for MongoConnector {
    type Connection = Database;

    async fn connect(&self) -> SyncResult<Database> {
        let url = self
            .url
            .as_deref()
            .ok_or_else(|| SyncError::missing_config("MONGODB_URL"))?;

        let client = Client::with_uri_str(url)
            .await
            .map_err(|e| SyncError::config(format!("invalid MongoDB URL: {e}")))?;

        let database = client.database(&self.database);

        // The driver connects lazily; ping so that a bad host fails here.
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| SyncError::database(e.to_string()))?;

        tracing::info!(database = %self.database, "Connected to MongoDB");
        Ok(database)
    }
}
