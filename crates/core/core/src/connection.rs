//! Shared, lazily established database connection.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::OnceCell;

use crate::error::SyncResult;
use crate::traits::Connector;

/// Owns a [`Connector`] and the single connection it produced.
///
/// The first caller of [`connection`](Self::connection) starts the connection
/// attempt and every concurrent caller awaits that same attempt. A successful
/// connection is cached for the lifetime of the manager; a failed attempt is
/// not, so the next call tries again.
///
/// Construct one at startup and share it behind an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// let manager = Arc::new(ConnectionManager::new(MongoConnector::from_env()));
/// let db = manager.connection().await?;
/// ```
pub struct ConnectionManager<C: Connector> {
    connector: C,
    connection: OnceCell<C::Connection>,
    attempts: AtomicUsize,
}

impl<C: Connector> ConnectionManager<C> {
    /// Creates a manager that has not connected yet.
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            connection: OnceCell::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Returns the shared connection, establishing it on first use.
    pub async fn connection(&self) -> SyncResult<&C::Connection> {
        if let Some(connection) = self.connection.get() {
            return Ok(connection);
        }

        self.connection
            .get_or_try_init(|| async {
                let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!(attempt, "Establishing database connection");

                match self.connector.connect().await {
                    Ok(connection) => {
                        tracing::info!(attempt, "Database connection established");
                        Ok(connection)
                    }
                    Err(e) => {
                        tracing::error!(attempt, error = %e, "Database connection failed");
                        Err(e)
                    }
                }
            })
            .await
    }

    /// Returns the connection if one has already been established.
    pub fn get(&self) -> Option<&C::Connection> {
        self.connection.get()
    }

    /// Returns true once a connection is cached.
    pub fn is_connected(&self) -> bool {
        self.connection.initialized()
    }

    /// Number of connection attempts made so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Returns the underlying connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }
}
