//! Core data types for Imaginify user sync.
//!
//! This module defines the canonical `UserRecord` stored in the database and
//! the `NewUser` / `UserUpdate` shapes the repository receives from the
//! webhook dispatcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user record synchronized from the identity provider.
///
/// `id` is generated by the repository when the record is persisted, while
/// `external_id` is the identity provider's stable identifier and is the key
/// every sync operation uses.
///
/// # Example
///
/// ```rust
/// use imaginify_core::{NewUser, UserRecord};
///
/// let new_user = NewUser::new("user_2abc", "ada@example.com");
/// let record = UserRecord::from_new("6651f0c2", new_user);
/// assert_eq!(record.external_id, "user_2abc");
/// assert_eq!(record.username, "");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Identifier generated by the repository
    pub id: String,

    /// The identity provider's user id
    pub external_id: String,

    /// Primary email address
    pub email: String,

    /// Username, empty when the provider has none
    pub username: String,

    /// First name, empty when absent
    pub first_name: String,

    /// Last name, empty when absent
    pub last_name: String,

    /// Profile photo URL, empty when absent
    pub photo: String,

    /// Timestamp when the record was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the record was last updated
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Builds a record from create parameters and a freshly generated id.
    pub fn from_new(id: impl Into<String>, user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            external_id: user.external_id,
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            photo: user.photo,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update in place and bumps `updated_at`.
    pub fn apply(&mut self, update: &UserUpdate) {
        self.first_name.clone_from(&update.first_name);
        self.last_name.clone_from(&update.last_name);
        self.username.clone_from(&update.username);
        self.photo.clone_from(&update.photo);
        self.updated_at = Utc::now();
    }
}

/// Parameters for creating a user record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub external_id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub photo: String,
}

impl NewUser {
    /// Creates parameters with the two required fields; the rest default to
    /// empty strings.
    pub fn new(external_id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Sets the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets first and last name.
    pub fn with_name(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    /// Sets the photo URL.
    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = photo.into();
        self
    }
}

/// The mutable subset of a user record.
///
/// Sent on every `user.updated` event; all four fields are always written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub photo: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_new() {
        let user = NewUser::new("user_1", "a@example.com")
            .with_username("ada")
            .with_name("Ada", "Lovelace")
            .with_photo("https://img.example.com/ada.png");
        let record = UserRecord::from_new("rec_1", user);

        assert_eq!(record.id, "rec_1");
        assert_eq!(record.external_id, "user_1");
        assert_eq!(record.first_name, "Ada");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_apply_update() {
        let mut record = UserRecord::from_new("rec_1", NewUser::new("user_1", "a@example.com"));
        let before = record.updated_at;

        record.apply(&UserUpdate {
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            username: "grace".into(),
            photo: String::new(),
        });

        assert_eq!(record.first_name, "Grace");
        assert_eq!(record.username, "grace");
        assert_eq!(record.email, "a@example.com");
        assert!(record.updated_at >= before);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = UserRecord::from_new("rec_1", NewUser::new("user_1", "a@example.com"));
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["externalId"], "user_1");
        assert_eq!(json["firstName"], "");
        assert!(json.get("external_id").is_none());
    }
}
