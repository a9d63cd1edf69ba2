use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::from_bson_datetime;

/// A per-session dark mode preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemePreference {
    /// The opaque session id carried in the `sessionId` cookie.
    pub session_id: String,
    pub dark_mode: bool,
    /// The record is removed by the TTL index after this instant.
    pub expires_at: DateTime<Utc>,
    /// Set on every write.
    pub last_updated: DateTime<Utc>,
}

/// The `themes` collection document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub session_id: String,
    #[serde(default)]
    pub dark_mode: bool,
    pub expires_at: bson::DateTime,
    pub last_updated: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

impl From<ThemeDocument> for ThemePreference {
    fn from(doc: ThemeDocument) -> Self {
        Self {
            session_id: doc.session_id,
            dark_mode: doc.dark_mode,
            expires_at: from_bson_datetime(doc.expires_at),
            last_updated: from_bson_datetime(doc.last_updated),
        }
    }
}
