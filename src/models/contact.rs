use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{from_bson_datetime, to_bson_datetime};

/// A contact submission as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// The hex string of the document id.
    pub id: String,
    pub name: String,
    pub email: String,
    pub message: String,
    /// When the form was submitted.
    pub submitted_at: DateTime<Utc>,
}

/// A validated submission that has not been stored yet.
///
/// Fields are already trimmed and the email is lowercased.
#[derive(Debug, Clone, PartialEq)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// The `contacts` collection document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: bson::DateTime,
    pub created_at: bson::DateTime,
    pub updated_at: bson::DateTime,
}

impl ContactDocument {
    /// Stamps a new document for the given submission.
    pub fn new(contact: NewContact, now: DateTime<Utc>) -> Self {
        let now = to_bson_datetime(now);
        Self {
            id: ObjectId::new(),
            name: contact.name,
            email: contact.email,
            message: contact.message,
            submitted_at: now,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<ContactDocument> for Contact {
    fn from(doc: ContactDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
            message: doc.message,
            submitted_at: from_bson_datetime(doc.submitted_at),
        }
    }
}
