//! MongoDB-backed [`UserRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use imaginify_core::error::{SyncError, SyncResult};
use imaginify_core::traits::UserRepository;
use imaginify_core::types::{NewUser, UserRecord, UserUpdate};
use imaginify_core::ConnectionManager;
use mongodb::bson::doc;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Collection, IndexModel};

use crate::connector::MongoConnector;
use crate::document::{UserDocument, by_external_id, set_update};

/// Collection holding user documents.
pub const USERS_COLLECTION: &str = "users";

/// Server error code for unique index violations.
const DUPLICATE_KEY: i32 = 11000;

/// User repository storing documents in the `users` collection.
///
/// Every call goes through the shared connection manager, so the first
/// operation after startup opens the connection.
#[derive(Clone)]
pub struct MongoUserRepository {
    manager: Arc<ConnectionManager<MongoConnector>>,
}

impl MongoUserRepository {
    /// Creates a repository over a shared connection manager.
    pub fn new(manager: Arc<ConnectionManager<MongoConnector>>) -> Self {
        Self { manager }
    }

    /// Returns the connection manager.
    pub fn manager(&self) -> &Arc<ConnectionManager<MongoConnector>> {
        &self.manager
    }

    /// Creates the unique index on `externalId`.
    pub async fn ensure_indexes(&self) -> SyncResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "externalId": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection()
            .await?
            .create_index(index)
            .await
            .map_err(|e| SyncError::database(e.to_string()))?;
        Ok(())
    }

    async fn collection(&self) -> SyncResult<Collection<UserDocument>> {
        let database = self.manager.connection().await?;
        Ok(database.collection::<UserDocument>(USERS_COLLECTION))
    }
}

fn map_write_error(err: mongodb::error::Error, external_id: &str) -> SyncError {
    if let ErrorKind::Write(WriteFailure::WriteError(ref write)) = *err.kind {
        if write.code == DUPLICATE_KEY {
            return SyncError::duplicate("user", "externalId", external_id);
        }
    }
    SyncError::database(err.to_string())
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create_user(&self, user: NewUser) -> SyncResult<UserRecord> {
        let external_id = user.external_id.clone();
        let document = UserDocument::from_new(user);

        self.collection()
            .await?
            .insert_one(&document)
            .await
            .map_err(|e| map_write_error(e, &external_id))?;

        tracing::debug!(id = %document.id, external_id = %external_id, "Inserted user document");
        Ok(document.into())
    }

    async fn get_user_by_external_id(&self, external_id: &str) -> SyncResult<Option<UserRecord>> {
        let found = self
            .collection()
            .await?
            .find_one(by_external_id(external_id))
            .await
            .map_err(|e| SyncError::database(e.to_string()))?;
        Ok(found.map(Into::into))
    }

    async fn update_user(&self, external_id: &str, update: UserUpdate) -> SyncResult<Option<UserRecord>> {
        let updated = self
            .collection()
            .await?
            .find_one_and_update(by_external_id(external_id), set_update(&update))
            .return_document(ReturnDocument::After)
            .await
            .map_err(|e| SyncError::database(e.to_string()))?;
        Ok(updated.map(Into::into))
    }

    async fn delete_user(&self, external_id: &str) -> SyncResult<Option<UserRecord>> {
        let deleted = self
            .collection()
            .await?
            .find_one_and_delete(by_external_id(external_id))
            .await
            .map_err(|e| SyncError::database(e.to_string()))?;
        Ok(deleted.map(Into::into))
    }

    async fn count_users(&self) -> SyncResult<usize> {
        let count = self
            .collection()
            .await?
            .count_documents(doc! {})
            .await
            .map_err(|e| SyncError::database(e.to_string()))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_operations_fail_without_url() {
        let manager = Arc::new(ConnectionManager::new(MongoConnector::new(None, "imaginify")));
        let repo = MongoUserRepository::new(Arc::clone(&manager));

        let err = repo
            .create_user(NewUser::new("user_1", "a@example.com"))
            .await
            .unwrap_err();
        assert!(err.is_configuration());

        // Each call retries since the failed attempt is not cached.
        assert!(repo.delete_user("user_1").await.is_err());
        assert_eq!(manager.attempts(), 2);
        assert!(!manager.is_connected());
    }
}
