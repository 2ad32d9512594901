//! Normalising arbitrary failures into log-ready messages.

use serde_json::Value;

/// Something that went wrong, in whatever shape it arrived.
#[derive(Debug)]
pub enum ErrorInput<'a> {
    /// A typed error.
    Error(&'a (dyn std::error::Error + 'a)),
    /// A bare message.
    Message(&'a str),
    /// Any other value, e.g. an error body from a remote API.
    Other(&'a Value),
}

impl<'a> From<&'a str> for ErrorInput<'a> {
    fn from(message: &'a str) -> Self {
        Self::Message(message)
    }
}

impl<'a> From<&'a Value> for ErrorInput<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::String(message) => Self::Message(message),
            other => Self::Other(other),
        }
    }
}

/// Logs `err` and returns a normalised message.
///
/// Typed errors and strings become `Error: <message>`; anything else becomes
/// `Unknown error: <json>`.
pub fn describe_error<'a>(err: impl Into<ErrorInput<'a>>) -> String {
    match err.into() {
        ErrorInput::Error(e) => {
            tracing::error!(error = %e, "Operation failed");
            format!("Error: {e}")
        }
        ErrorInput::Message(message) => {
            tracing::error!(error = message, "Operation failed");
            format!("Error: {message}")
        }
        ErrorInput::Other(value) => {
            tracing::error!(error = %value, "Operation failed with unknown error");
            format!("Unknown error: {value}")
        }
    }
}
