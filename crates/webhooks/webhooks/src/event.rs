//! Webhook envelope and typed event decoding.
//!
//! The envelope is parsed as-is after signature verification, then
//! [`ClerkEvent::decode`] validates the payload for the event types this
//! service handles and maps it onto repository inputs.

use imaginify_core::types::{NewUser, UserUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{WebhookError, WebhookResult};

/// Event type tags.
pub mod event_types {
    pub const USER_CREATED: &str = "user.created";
    pub const USER_UPDATED: &str = "user.updated";
    pub const USER_DELETED: &str = "user.deleted";
}

/// Raw webhook envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// Event data; shape depends on the type.
    #[serde(default)]
    pub data: Value,
    /// Envelope object tag (usually "event").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    /// Provider-side timestamp in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// An email address entry on a user payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(default)]
    pub id: Option<String>,
    pub email_address: String,
}

/// User object sent with `user.created` and `user.updated`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Option<Vec<EmailAddress>>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UserPayload {
    /// Returns the primary email address, if any.
    ///
    /// Picks the entry matching `primary_email_address_id`, falling back to the
    /// first entry. Blank addresses are ignored.
    pub fn primary_email(&self) -> Option<&str> {
        let addresses = self.email_addresses.as_deref().unwrap_or_default();

        let primary = self
            .primary_email_address_id
            .as_deref()
            .and_then(|primary_id| {
                addresses
                    .iter()
                    .find(|a| a.id.as_deref() == Some(primary_id))
            })
            .or_else(|| addresses.first());

        primary
            .map(|a| a.email_address.trim())
            .filter(|email| !email.is_empty())
    }

    /// Maps the payload onto create parameters.
    pub fn to_new_user(&self) -> WebhookResult<NewUser> {
        let email = self.primary_email().ok_or_else(|| {
            WebhookError::Validation(format!("user {} has no email address", self.id))
        })?;

        Ok(NewUser {
            external_id: self.id.clone(),
            email: email.to_string(),
            username: self.username.clone().unwrap_or_default(),
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            photo: self.image_url.clone().unwrap_or_default(),
        })
    }

    /// Maps the payload onto the mutable fields.
    pub fn to_update(&self) -> UserUpdate {
        UserUpdate {
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            username: self.username.clone().unwrap_or_default(),
            photo: self.image_url.clone().unwrap_or_default(),
        }
    }
}

/// Object sent with `user.deleted`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedPayload {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub deleted: bool,
}

/// A decoded event, ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum ClerkEvent {
    /// `user.created`
    UserCreated(NewUser),
    /// `user.updated`
    UserUpdated {
        external_id: String,
        update: UserUpdate,
    },
    /// `user.deleted`
    UserDeleted { external_id: String },
    /// Any other type tag.
    Unhandled { event_type: String },
}

impl ClerkEvent {
    /// Decodes an envelope, validating the payload for handled types.
    pub fn decode(event: WebhookEvent) -> WebhookResult<Self> {
        match event.event_type.as_str() {
            event_types::USER_CREATED => {
                let payload = user_payload(event.data)?;
                Ok(Self::UserCreated(payload.to_new_user()?))
            }
            event_types::USER_UPDATED => {
                let payload = user_payload(event.data)?;
                Ok(Self::UserUpdated {
                    update: payload.to_update(),
                    external_id: payload.id,
                })
            }
            event_types::USER_DELETED => {
                let payload: DeletedPayload = serde_json::from_value(event.data)?;
                let external_id = payload
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .ok_or_else(|| WebhookError::InvalidPayload("user.deleted payload has no id".into()))?;
                Ok(Self::UserDeleted { external_id })
            }
            _ => Ok(Self::Unhandled {
                event_type: event.event_type,
            }),
        }
    }

    /// Returns the type tag this event was decoded from.
    pub fn event_type(&self) -> &str {
        match self {
            Self::UserCreated(_) => event_types::USER_CREATED,
            Self::UserUpdated { .. } => event_types::USER_UPDATED,
            Self::UserDeleted { .. } => event_types::USER_DELETED,
            Self::Unhandled { event_type } => event_type,
        }
    }
}

fn user_payload(data: Value) -> WebhookResult<UserPayload> {
    let payload: UserPayload = serde_json::from_value(data)?;
    if payload.id.trim().is_empty() {
        return Err(WebhookError::InvalidPayload("user payload has an empty id".into()));
    }
    Ok(payload)
}
