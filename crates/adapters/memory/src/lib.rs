//! # Imaginify Memory Adapter
//!
//! An in-memory user repository, primarily intended for testing and local
//! development without a database.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use imaginify_adapter_memory::MemoryAdapter;
//!
//! let users: Arc<dyn UserRepository> = Arc::new(MemoryAdapter::new());
//! let dispatcher = EventDispatcher::new(users);
//! ```

use async_trait::async_trait;
use imaginify_core::error::{SyncError, SyncResult};
use imaginify_core::traits::UserRepository;
use imaginify_core::types::{NewUser, UserRecord, UserUpdate};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage keyed by external id.
type Store<T> = Arc<RwLock<HashMap<String, T>>>;

/// In-memory user repository.
///
/// Data is lost when the process exits. Clones share the same store.
#[derive(Debug, Clone)]
pub struct MemoryAdapter {
    users: Store<UserRecord>,
}

impl MemoryAdapter {
    /// Creates a new, empty adapter.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Clears all stored data.
    pub async fn clear(&self) {
        self.users.write().await.clear();
    }

    /// Returns the number of users stored.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    /// Inserts a record as-is, bypassing id generation. Handy for seeding tests.
    pub async fn insert(&self, record: UserRecord) {
        self.users
            .write()
            .await
            .insert(record.external_id.clone(), record);
    }
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryAdapter {
    async fn create_user(&self, user: NewUser) -> SyncResult<UserRecord> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.external_id) {
            return Err(SyncError::duplicate("user", "externalId", &user.external_id));
        }

        let record = UserRecord::from_new(uuid::Uuid::new_v4().simple().to_string(), user);
        users.insert(record.external_id.clone(), record.clone());
        tracing::debug!(id = %record.id, external_id = %record.external_id, "Stored user in memory");
        Ok(record)
    }

    async fn get_user_by_external_id(&self, external_id: &str) -> SyncResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(external_id).cloned())
    }

    async fn update_user(&self, external_id: &str, update: UserUpdate) -> SyncResult<Option<UserRecord>> {
        let mut users = self.users.write().await;

        Ok(users.get_mut(external_id).map(|record| {
            record.apply(&update);
            record.clone()
        }))
    }

    async fn delete_user(&self, external_id: &str) -> SyncResult<Option<UserRecord>> {
        let mut users = self.users.write().await;
        Ok(users.remove(external_id))
    }

    async fn count_users(&self) -> SyncResult<usize> {
        Ok(self.users.read().await.len())
    }
}
