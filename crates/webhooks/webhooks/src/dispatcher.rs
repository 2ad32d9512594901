//! Dispatches decoded events to the user repository.

use std::sync::Arc;

use imaginify_core::traits::{IdentityProvider, UserRepository};
use imaginify_core::types::{NewUser, UserRecord};
use serde::Serialize;

use crate::error::WebhookResult;
use crate::event::ClerkEvent;

/// Outcome of writing the local id back to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum MetadataSync {
    /// Metadata was updated.
    Attached,
    /// No identity provider is configured.
    Skipped,
    /// The provider call failed; the user record was still created.
    Failed { reason: String },
}

impl MetadataSync {
    /// Returns true when the metadata was written.
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached)
    }
}

/// Result of dispatching one event.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A user record was created.
    Created {
        user: UserRecord,
        metadata: MetadataSync,
    },
    /// An update was applied; `None` when no record matched.
    Updated { user: Option<UserRecord> },
    /// A record was removed; `None` when it was already absent.
    Deleted { user: Option<UserRecord> },
    /// The event type is not handled; nothing was written.
    Unhandled { event_type: String },
}

/// Routes decoded events to repository calls.
#[derive(Clone)]
pub struct EventDispatcher {
    users: Arc<dyn UserRepository>,
    identity: Option<Arc<dyn IdentityProvider>>,
}

impl EventDispatcher {
    /// Creates a dispatcher without an identity provider.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            identity: None,
        }
    }

    /// Sets the identity provider used to attach metadata after create.
    pub fn with_identity_provider(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Returns the user repository.
    pub fn users(&self) -> &Arc<dyn UserRepository> {
        &self.users
    }

    /// Dispatches a single event.
    pub async fn dispatch(&self, event: ClerkEvent) -> WebhookResult<DispatchOutcome> {
        match event {
            ClerkEvent::UserCreated(new_user) => self.create(new_user).await,
            ClerkEvent::UserUpdated {
                external_id,
                update,
            } => {
                let user = self.users.update_user(&external_id, update).await?;
                if user.is_none() {
                    tracing::warn!(external_id = %external_id, "user.updated for unknown user");
                }
                Ok(DispatchOutcome::Updated { user })
            }
            ClerkEvent::UserDeleted { external_id } => {
                let user = self.users.delete_user(&external_id).await?;
                tracing::info!(
                    external_id = %external_id,
                    removed = user.is_some(),
                    "Processed user.deleted"
                );
                Ok(DispatchOutcome::Deleted { user })
            }
            ClerkEvent::Unhandled { event_type } => {
                tracing::info!(event_type = %event_type, "Unhandled webhook event type");
                Ok(DispatchOutcome::Unhandled { event_type })
            }
        }
    }

    /// Creates the record, then attaches its id to the provider metadata.
    async fn create(&self, new_user: NewUser) -> WebhookResult<DispatchOutcome> {
        let user = self.users.create_user(new_user).await?;
        tracing::info!(id = %user.id, external_id = %user.external_id, "Created user");

        let metadata = self.attach_metadata(&user).await;
        Ok(DispatchOutcome::Created { user, metadata })
    }

    async fn attach_metadata(&self, user: &UserRecord) -> MetadataSync {
        let Some(identity) = &self.identity else {
            return MetadataSync::Skipped;
        };

        let metadata = serde_json::json!({ "userId": user.id });
        match identity
            .update_public_metadata(&user.external_id, metadata)
            .await
        {
            Ok(()) => MetadataSync::Attached,
            Err(e) => {
                tracing::error!(
                    provider = identity.id(),
                    external_id = %user.external_id,
                    error = %e,
                    "Failed to attach user id to provider metadata"
                );
                MetadataSync::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use imaginify_adapter_memory::MemoryAdapter;
    use imaginify_core::error::{SyncError, SyncResult};
    use imaginify_core::types::UserUpdate;
    use serde_json::{Value, json};

    struct DownProvider;

    #[async_trait]
    impl IdentityProvider for DownProvider {
        fn id(&self) -> &'static str {
            "down"
        }

        async fn update_public_metadata(&self, _external_id: &str, _metadata: Value) -> SyncResult<()> {
            Err(SyncError::identity_provider("timed out"))
        }
    }

    fn dispatcher(adapter: &MemoryAdapter) -> EventDispatcher {
        EventDispatcher::new(Arc::new(adapter.clone()))
    }

    #[tokio::test]
    async fn test_create_without_provider_skips_metadata() {
        let adapter = MemoryAdapter::new();
        let outcome = dispatcher(&adapter)
            .dispatch(ClerkEvent::UserCreated(NewUser::new("user_1", "a@example.com")))
            .await
            .unwrap();

        match outcome {
            DispatchOutcome::Created { user, metadata } => {
                assert_eq!(user.external_id, "user_1");
                assert_eq!(metadata, MetadataSync::Skipped);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_with_failing_provider() {
        let adapter = MemoryAdapter::new();
        let outcome = dispatcher(&adapter)
            .with_identity_provider(Arc::new(DownProvider))
            .dispatch(ClerkEvent::UserCreated(NewUser::new("user_1", "a@example.com")))
            .await
            .unwrap();

        let DispatchOutcome::Created { metadata, .. } = outcome else {
            panic!("expected Created");
        };
        assert!(!metadata.is_attached());
        assert_eq!(
            serde_json::to_value(&metadata).unwrap()["status"],
            json!("failed")
        );
        assert_eq!(adapter.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_create_propagates() {
        let adapter = MemoryAdapter::new();
        let dispatcher = dispatcher(&adapter);
        let event = ClerkEvent::UserCreated(NewUser::new("user_1", "a@example.com"));

        dispatcher.dispatch(event.clone()).await.unwrap();
        let err = dispatcher.dispatch(event).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_user() {
        let adapter = MemoryAdapter::new();
        let dispatcher = dispatcher(&adapter);

        let updated = dispatcher
            .dispatch(ClerkEvent::UserUpdated {
                external_id: "ghost".into(),
                update: UserUpdate::default(),
            })
            .await
            .unwrap();
        assert_eq!(updated, DispatchOutcome::Updated { user: None });

        let deleted = dispatcher
            .dispatch(ClerkEvent::UserDeleted {
                external_id: "ghost".into(),
            })
            .await
            .unwrap();
        assert_eq!(deleted, DispatchOutcome::Deleted { user: None });
    }

    #[tokio::test]
    async fn test_unhandled_passes_through() {
        let outcome = dispatcher(&MemoryAdapter::new())
            .dispatch(ClerkEvent::Unhandled {
                event_type: "email.created".into(),
            })
            .await
            .unwrap();
        assert_eq!(
            outcome,
            DispatchOutcome::Unhandled {
                event_type: "email.created".into()
            }
        );
    }
}
