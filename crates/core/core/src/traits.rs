//! Core traits for Imaginify user sync.
//!
//! This module defines the trait interfaces that storage adapters, identity
//! provider clients and database connectors implement to plug into the
//! webhook dispatcher.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SyncResult;
use crate::types::{NewUser, UserRecord, UserUpdate};

/// Trait for user storage adapters (database backends).
///
/// Every operation is keyed by the identity provider's external id; the
/// record's own `id` is generated by the adapter on create.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persists a new user and returns the stored record.
    async fn create_user(&self, user: NewUser) -> SyncResult<UserRecord>;

    /// Gets a user by external id.
    async fn get_user_by_external_id(&self, external_id: &str) -> SyncResult<Option<UserRecord>>;

    /// Applies a partial update. Returns `None` when no record matches.
    async fn update_user(&self, external_id: &str, update: UserUpdate) -> SyncResult<Option<UserRecord>>;

    /// Deletes a user. Returns the removed record, or `None` when absent.
    async fn delete_user(&self, external_id: &str) -> SyncResult<Option<UserRecord>>;

    /// Counts stored users.
    async fn count_users(&self) -> SyncResult<usize>;
}

/// Trait for identity provider clients.
///
/// Used after a user is created to write the local record id back into the
/// provider's public metadata.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns a short identifier for logs (e.g. "clerk").
    fn id(&self) -> &'static str;

    /// Replaces the public metadata for the given external user.
    async fn update_public_metadata(&self, external_id: &str, metadata: Value) -> SyncResult<()>;
}

/// Trait for establishing a database connection.
///
/// Wrapped by [`ConnectionManager`](crate::connection::ConnectionManager),
/// which makes sure `connect` runs at most once at a time.
#[async_trait]
pub trait Connector: Send + Sync {
    /// The connection handle shared by every caller.
    type Connection: Send + Sync;

    /// Opens a new connection.
    async fn connect(&self) -> SyncResult<Self::Connection>;
}
