//! Webhook error types.

use imaginify_core::SyncError;
use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Error type for webhook ingestion.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// A required transport header is missing or empty.
    #[error("Missing required webhook header: {0}")]
    MissingHeader(String),

    /// Invalid signature.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature timestamp outside the tolerance window.
    #[error("Signature expired")]
    ExpiredSignature,

    /// Invalid payload.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Payload is well-formed but lacks data the event requires.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Event type this service does not handle.
    #[error("Unhandled event type: {0}")]
    UnhandledEventType(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Repository or identity provider failure.
    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl WebhookError {
    /// Returns the HTTP status reported to the webhook sender.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingHeader(_)
            | Self::InvalidSignature
            | Self::ExpiredSignature
            | Self::InvalidPayload(_)
            | Self::Validation(_)
            | Self::UnhandledEventType(_) => 400,
            Self::ConfigError(_) | Self::Sync(_) => 500,
        }
    }

    /// Returns the message placed in the response body.
    ///
    /// Internal details stay in the logs.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MissingHeader(_) => "Missing required webhook headers",
            Self::InvalidSignature | Self::ExpiredSignature => "Invalid webhook signature",
            Self::InvalidPayload(_) => "Invalid payload",
            Self::Validation(_) => "Invalid user data",
            Self::UnhandledEventType(_) => "Unhandled event type",
            Self::ConfigError(_) => "Server configuration error",
            Self::Sync(e) if e.is_configuration() => "Server configuration error",
            Self::Sync(_) => "Internal server error",
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::InvalidPayload(err.to_string())
    }
}
