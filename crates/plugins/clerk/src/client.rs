//! Clerk Backend API client.

use async_trait::async_trait;
use imaginify_core::error::{SyncError, SyncResult};
use imaginify_core::traits::IdentityProvider;
use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::Value;

use crate::config::ClerkConfig;

/// Body of `PATCH /users/{id}/metadata`.
#[derive(Debug, Serialize)]
struct UpdateMetadataRequest<'a> {
    public_metadata: &'a Value,
}

/// HTTP client for the Clerk Backend API.
#[derive(Debug, Clone)]
pub struct ClerkClient {
    http_client: Client,
    config: ClerkConfig,
}

impl ClerkClient {
    /// Creates a client from config.
    pub fn new(config: ClerkConfig) -> SyncResult<Self> {
        if config.secret_key.trim().is_empty() {
            return Err(SyncError::missing_config("CLERK_SECRET_KEY"));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SyncError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http_client, config })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClerkConfig {
        &self.config
    }

    /// Builds `{api_url}/users/{external_id}/metadata` with the id escaped as
    /// a single path segment.
    fn metadata_url(&self, external_id: &str) -> SyncResult<Url> {
        let mut url = Url::parse(&self.config.api_url)
            .map_err(|e| SyncError::config(format!("invalid CLERK_API_URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::config("CLERK_API_URL cannot be a base URL"))?
            .pop_if_empty()
            .extend(["users", external_id, "metadata"]);
        Ok(url)
    }
}

#[async_trait]
impl IdentityProvider for ClerkClient {
    fn id(&self) -> &'static str {
        "clerk"
    }

    async fn update_public_metadata(&self, external_id: &str, metadata: Value) -> SyncResult<()> {
        let response = self
            .http_client
            .patch(self.metadata_url(external_id)?)
            .bearer_auth(&self.config.secret_key)
            .json(&UpdateMetadataRequest {
                public_metadata: &metadata,
            })
            .send()
            .await
            .map_err(|e| SyncError::identity_provider(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SyncError::identity_provider(format!(
                "Clerk metadata update failed with {}: {}",
                status, error_text
            )));
        }

        tracing::debug!(external_id = %external_id, "Updated Clerk public metadata");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        let err = ClerkClient::new(ClerkConfig::new("  ")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_metadata_url() {
        let client = ClerkClient::new(ClerkConfig::new("sk_test_123")).unwrap();
        assert_eq!(
            client.metadata_url("user_2abc").unwrap().as_str(),
            "https://api.clerk.com/v1/users/user_2abc/metadata"
        );
    }

    #[test]
    fn test_metadata_url_escapes_external_id() {
        let client = ClerkClient::new(ClerkConfig::new("sk_test_123")).unwrap();
        assert_eq!(
            client.metadata_url("../admin?x=1#f").unwrap().as_str(),
            "https://api.clerk.com/v1/users/..%2Fadmin%3Fx=1%23f/metadata"
        );

        let trailing = ClerkClient::new(ClerkConfig {
            api_url: "https://clerk.test/v1/".to_string(),
            ..ClerkConfig::new("sk_test_123")
        })
        .unwrap();
        assert_eq!(
            trailing.metadata_url("user_1").unwrap().as_str(),
            "https://clerk.test/v1/users/user_1/metadata"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let client = ClerkClient::new(ClerkConfig::new("sk_test_123").api_url("not a url")).unwrap();
        assert!(client.metadata_url("user_1").unwrap_err().is_configuration());
    }
}
