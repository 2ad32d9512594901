//! Stored shape of a user in the `users` collection.

use imaginify_core::types::{NewUser, UserRecord, UserUpdate};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{DateTime, Document, doc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub external_id: String,
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub photo: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl UserDocument {
    pub fn from_new(user: NewUser) -> Self {
        let now = DateTime::now();
        Self {
            id: ObjectId::new(),
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
}

impl From<UserDocument> for UserRecord {
    fn from(doc: UserDocument) -> Self {
        UserRecord {
            id: doc.id.to_hex(),
            external_id: doc.external_id,
            email: doc.email,
            username: doc.username,
            first_name: doc.first_name,
            last_name: doc.last_name,
            photo: doc.photo,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

/// Filter matching a user by external id.
pub(crate) fn by_external_id(external_id: &str) -> Document {
    doc! { "externalId": external_id }
}

/// `$set` update for the mutable fields.
pub(crate) fn set_update(update: &UserUpdate) -> Document {
    doc! {
        "$set": {
            "firstName": update.first_name.as_str(),
            "lastName": update.last_name.as_str(),
            "username": update.username.as_str(),
            "photo": update.photo.as_str(),
            "updatedAt": DateTime::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_to_record() {
        let doc = UserDocument::from_new(
            NewUser::new("user_1", "a@example.com").with_name("Ada", "Lovelace"),
        );
        let id = doc.id.to_hex();
        let record = UserRecord::from(doc);

        assert_eq!(record.id, id);
        assert_eq!(record.external_id, "user_1");
        assert_eq!(record.last_name, "Lovelace");
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_document_field_names() {
        let doc = UserDocument::from_new(NewUser::new("user_1", "a@example.com"));
        let bson = mongodb::bson::to_document(&doc).unwrap();

        assert!(bson.contains_key("_id"));
        assert_eq!(bson.get_str("externalId").unwrap(), "user_1");
        assert!(bson.contains_key("firstName"));
        assert!(bson.get_datetime("createdAt").is_ok());
    }

    #[test]
    fn test_set_update_only_touches_mutable_fields() {
        let update = UserUpdate {
            first_name: "Grace".into(),
            ..Default::default()
        };
        let doc = set_update(&update);
        let set = doc.get_document("$set").unwrap();

        assert_eq!(set.get_str("firstName").unwrap(), "Grace");
        assert_eq!(set.get_str("photo").unwrap(), "");
        assert!(!set.contains_key("email"));
        assert!(!set.contains_key("externalId"));
        assert_eq!(set.len(), 5);
    }
}
