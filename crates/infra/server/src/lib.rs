//! # Imaginify Server
//!
//! Wires configuration, the user repository, the identity-provider client and
//! the webhook handler into an Axum server.

mod config;

pub use config::{
    AppConfig, CONFIG_PATH_ENV, ClerkSettings, ConfigError, DatabaseBackend, DatabaseConfig,
    ServerConfig, WebhookConfig,
};

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use imaginify_adapter_memory::MemoryAdapter;
use imaginify_adapter_mongodb::{MongoConnectionManager, MongoConnector, MongoUserRepository};
use imaginify_axum::webhook_routes;
use imaginify_core::traits::{IdentityProvider, UserRepository};
use imaginify_plugin_clerk::{ClerkClient, ClerkConfig};
use imaginify_webhooks::{EventDispatcher, WebhookHandler, WebhookReceiver};
use tower_http::trace::TraceLayer;

/// Server startup errors.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The assembled webhook server.
pub struct AppServer {
    /// Configuration the server was built from.
    pub config: AppConfig,
    handler: WebhookHandler,
    mongo: Option<Arc<MongoConnectionManager>>,
}

impl AppServer {
    /// Builds the server from configuration.
    ///
    /// Missing secrets do not fail startup: without a webhook secret every
    /// webhook is answered with 500, and without a Clerk key metadata
    /// write-back is skipped.
    pub fn new(config: AppConfig) -> Self {
        let receiver = build_receiver(&config.webhook);

        let (users, mongo) = build_repository(&config.database);

        let mut dispatcher = EventDispatcher::new(users);
        if let Some(identity) = build_identity_provider(&config.clerk) {
            dispatcher = dispatcher.with_identity_provider(identity);
        }

        Self {
            handler: WebhookHandler::new(receiver, dispatcher),
            config,
            mongo,
        }
    }

    /// Returns the webhook handler.
    pub fn handler(&self) -> &WebhookHandler {
        &self.handler
    }

    /// Returns the router with request tracing.
    pub fn router(&self) -> Router {
        webhook_routes(self.handler.clone()).layer(TraceLayer::new_for_http())
    }

    /// Binds the listener and serves until Ctrl-C.
    pub async fn run(self) -> Result<(), ServerError> {
        if let Some(manager) = &self.mongo {
            if manager.connector().has_url() {
                let repository = MongoUserRepository::new(Arc::clone(manager));
                tokio::spawn(async move {
                    if let Err(e) = repository.ensure_indexes().await {
                        tracing::warn!(error = %e, "Failed to ensure user indexes");
                    }
                });
            }
        }

        let address = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!(
            address = %address,
            webhook_configured = self.handler.is_configured(),
            backend = ?self.config.database.backend,
            "Starting Imaginify server"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

type Repository = (Arc<dyn UserRepository>, Option<Arc<MongoConnectionManager>>);

fn build_repository(config: &DatabaseConfig) -> Repository {
    match config.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory user store; data is lost on restart");
            let users: Arc<dyn UserRepository> = Arc::new(MemoryAdapter::new());
            (users, None)
        }
        DatabaseBackend::Mongodb => {
            let connector = MongoConnector::new(config.url.clone(), config.name.clone());
            if !connector.has_url() {
                tracing::warn!("MONGODB_URL is not set; database operations will fail");
            }
            let manager = Arc::new(MongoConnectionManager::new(connector));
            let users: Arc<dyn UserRepository> =
                Arc::new(MongoUserRepository::new(Arc::clone(&manager)));
            (users, Some(manager))
        }
    }
}

fn build_receiver(config: &WebhookConfig) -> Option<WebhookReceiver> {
    let Some(secret) = config.secret.as_deref() else {
        tracing::warn!("WEBHOOK_SECRET is not set; webhooks will be rejected");
        return None;
    };

    match WebhookReceiver::new(secret) {
        Ok(receiver) if config.tolerance_secs > 0 => Some(receiver.with_tolerance(config.tolerance_secs)),
        Ok(receiver) => Some(receiver.without_tolerance()),
        Err(e) => {
            tracing::error!(error = %e, "Invalid webhook secret; webhooks will be rejected");
            None
        }
    }
}

fn build_identity_provider(config: &ClerkSettings) -> Option<Arc<dyn IdentityProvider>> {
    let Some(secret_key) = config.secret_key.as_deref() else {
        tracing::info!("CLERK_SECRET_KEY is not set; metadata write-back disabled");
        return None;
    };

    let clerk_config = ClerkConfig::new(secret_key)
        .api_url(config.api_url.as_str())
        .timeout(Duration::from_secs(config.timeout_secs));

    match ClerkClient::new(clerk_config) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Clerk client; metadata write-back disabled");
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.backend = DatabaseBackend::Memory;
        config
    }

    #[test]
    fn test_missing_secret_leaves_handler_unconfigured() {
        let server = AppServer::new(memory_config());
        assert!(!server.handler().is_configured());
    }

    #[test]
    fn test_invalid_secret_leaves_handler_unconfigured() {
        let mut config = memory_config();
        config.webhook.secret = Some("not-a-secret!".to_string());
        assert!(!AppServer::new(config).handler().is_configured());
    }

    #[test]
    fn test_valid_secret() {
        let mut config = memory_config();
        config.webhook.secret = Some("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw".to_string());
        config.webhook.tolerance_secs = 0;
        assert!(AppServer::new(config).handler().is_configured());
    }

    #[tokio::test]
    async fn test_router_serves_health() {
        let response = AppServer::new(memory_config())
            .router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_mongodb_without_url_fails_per_request() {
        let mut config = AppConfig::default();
        config.webhook.secret = Some("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw".to_string());
        let server = AppServer::new(config);

        let users = server.handler().dispatcher().users();
        let err = users.get_user_by_external_id("user_1").await.unwrap_err();
        assert!(err.is_configuration());
    }
}
