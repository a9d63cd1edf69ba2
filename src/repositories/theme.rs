use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::{options::ReturnDocument, Collection, Database};

use crate::{
    db::{to_bson_datetime, THEMES_COLLECTION},
    error::{AppError, Result},
    models::theme::{ThemeDocument, ThemePreference},
};

/// Storage for per-session theme preferences.
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Finds the preference of a session unless it has already expired at `now`.
    async fn find_live(&self, session_id: &str, now: DateTime<Utc>) -> Result<Option<ThemePreference>>;

    /// Creates or replaces the preference of a session.
    ///
    /// `last_updated` of the stored record ends up strictly greater than the
    /// value it had before the write.
    async fn upsert(
        &self,
        session_id: &str,
        dark_mode: bool,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<ThemePreference>;
}

/// `ThemeRepository` backed by the `themes` collection.
#[derive(Clone)]
pub struct MongoThemeRepository {
    collection: Collection<ThemeDocument>,
}

impl MongoThemeRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(THEMES_COLLECTION),
        }
    }
}

#[async_trait]
impl ThemeRepository for MongoThemeRepository {
    async fn find_live(&self, session_id: &str, now: DateTime<Utc>) -> Result<Option<ThemePreference>> {
        let filter = doc! {
            "sessionId": session_id,
            "expiresAt": { "$gt": to_bson_datetime(now) },
        };
        let document = self.collection.find_one(filter).await?;
        Ok(document.map(ThemePreference::from))
    }

    async fn upsert(
        &self,
        session_id: &str,
        dark_mode: bool,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<ThemePreference> {
        let now = to_bson_datetime(now);
        // Pipeline update: lastUpdated = max(now, previous + 1ms), createdAt kept once set.
        let pipeline = vec![doc! {
            "$set": {
                "darkMode": dark_mode,
                "lastUpdated": { "$max": [now, { "$add": ["$lastUpdated", 1] }] },
                "expiresAt": to_bson_datetime(expires_at),
                "updatedAt": now,
                "createdAt": { "$ifNull": ["$createdAt", now] },
            }
        }];

        let document = self
            .collection
            .find_one_and_update(doc! { "sessionId": session_id }, pipeline)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Upsert returned no theme for session {}", session_id)))?;

        Ok(document.into())
    }
}
