//! Configuration for the Clerk client.

use std::time::Duration;

/// Base URL of the Clerk Backend API.
pub const DEFAULT_API_URL: &str = "https://api.clerk.com/v1";

/// Configuration for [`ClerkClient`](crate::ClerkClient).
#[derive(Debug, Clone)]
pub struct ClerkConfig {
    /// Secret key (`sk_...`) sent as a bearer token.
    pub secret_key: String,
    /// API base URL. Default: `https://api.clerk.com/v1`.
    pub api_url: String,
    /// Request timeout. Default: 10 seconds.
    pub timeout: Duration,
}

impl ClerkConfig {
    /// Creates a config with the default API URL and timeout.
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Overrides the API base URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Overrides the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClerkConfig::new("sk_test_123");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_api_url_trailing_slash() {
        let config = ClerkConfig::new("sk_test_123").api_url("http://localhost:9000/v1/");
        assert_eq!(config.api_url, "http://localhost:9000/v1");
    }
}
