//! Error types for Imaginify user sync.
//!
//! This module defines the `SyncError` enum which represents everything that
//! can go wrong below the webhook boundary: configuration, persistence and
//! identity-provider calls.

use thiserror::Error;

/// The main error type for sync operations.
///
/// Webhook-level failures (headers, signatures, payload shape) live in the
/// webhooks crate; this enum covers the collaborators the dispatcher calls.
#[derive(Debug, Error)]
pub enum SyncError {
    // ==================== Configuration Errors ====================
    /// A required configuration value is missing.
    #[error("Missing configuration: {key}")]
    MissingConfiguration { key: String },

    /// The configuration is invalid.
    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    // ==================== Storage Errors ====================
    /// A database operation failed.
    #[error("Database error: {message}")]
    DatabaseError { message: String },

    /// The requested record was not found.
    #[error("Record not found: {entity} with {key}={value}")]
    NotFound {
        entity: String,
        key: String,
        value: String,
    },

    /// A unique constraint was violated (e.g., duplicate external id).
    #[error("Duplicate entry: {entity} with {field}={value} already exists")]
    DuplicateEntry {
        entity: String,
        field: String,
        value: String,
    },

    // ==================== Identity Provider Errors ====================
    /// A call to the identity provider failed.
    #[error("Identity provider error: {message}")]
    IdentityProviderError { message: String },

    // ==================== Internal Errors ====================
    /// Serialization/deserialization failed.
    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    /// An internal error occurred.
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl SyncError {
    /// Creates a new missing configuration error.
    pub fn missing_config(key: impl Into<String>) -> Self {
        Self::MissingConfiguration { key: key.into() }
    }

    /// Creates a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigurationError {
            message: message.into(),
        }
    }

    /// Creates a new database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::DatabaseError {
            message: message.into(),
        }
    }

    /// Creates a new not found error.
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a new duplicate entry error.
    pub fn duplicate(entity: impl Into<String>, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateEntry {
            entity: entity.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Creates a new identity provider error.
    pub fn identity_provider(message: impl Into<String>) -> Self {
        Self::IdentityProviderError {
            message: message.into(),
        }
    }

    /// Creates a new internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Returns true if the error comes from missing or invalid configuration.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingConfiguration { .. } | Self::ConfigurationError { .. }
        )
    }

    /// Returns an HTTP status code appropriate for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::DuplicateEntry { .. } => 409,
            Self::IdentityProviderError { .. } => 502,
            _ => 500,
        }
    }
}

/// A Result type alias using SyncError.
pub type SyncResult<T> = Result<T, SyncError>;

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
        }
    }
}
