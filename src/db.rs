use async_trait::async_trait;
use bson::doc;
use chrono::{DateTime, Utc};
use mongodb::{
    options::{ClientOptions, IndexOptions},
    Client, Database, IndexModel,
};
use std::time::Duration;

use crate::{
    error::Result,
    models::{contact::ContactDocument, theme::ThemeDocument},
};

/// The collection holding contact submissions.
pub const CONTACTS_COLLECTION: &str = "contacts";
/// The collection holding theme preferences.
pub const THEMES_COLLECTION: &str = "themes";
/// How long the health check waits for a `ping` reply.
pub const PING_TIMEOUT: Duration = Duration::from_secs(2);

/// Creates the MongoDB client and returns a handle to the given database.
///
/// Only the URI is validated here; the driver connects lazily, so an
/// unreachable server does not fail this call.
pub async fn connect(mongodb_uri: &str, database_name: &str) -> Result<Database> {
    let mut options = ClientOptions::parse(mongodb_uri).await?;
    options.app_name = Some("portfolio-api".to_string());

    let client = Client::with_options(options)?;
    Ok(client.database(database_name))
}

/// Creates the indexes both collections rely on.
///
/// `themes.expiresAt` carries a TTL index with a zero offset, so MongoDB
/// removes a preference as soon as its `expiresAt` passes.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    db.collection::<ContactDocument>(CONTACTS_COLLECTION)
        .create_index(IndexModel::builder().keys(doc! { "submittedAt": 1 }).build())
        .await?;

    let themes = db.collection::<ThemeDocument>(THEMES_COLLECTION);
    themes
        .create_index(
            IndexModel::builder()
                .keys(doc! { "sessionId": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;
    themes
        .create_index(
            IndexModel::builder()
                .keys(doc! { "expiresAt": 1 })
                .options(
                    IndexOptions::builder()
                        .expire_after(Duration::from_secs(0))
                        .build(),
                )
                .build(),
        )
        .await?;

    Ok(())
}

/// Reports whether the database currently answers.
#[async_trait]
pub trait ConnectionCheck: Send + Sync {
    async fn is_connected(&self) -> bool;
}

/// Checks MongoDB with a bounded `ping` command.
#[derive(Clone)]
pub struct MongoPing {
    db: Database,
}

impl MongoPing {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ConnectionCheck for MongoPing {
    async fn is_connected(&self) -> bool {
        match tokio::time::timeout(PING_TIMEOUT, self.db.run_command(doc! { "ping": 1 })).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!("MongoDB ping failed: {}", e);
                false
            }
            Err(_) => {
                tracing::debug!("MongoDB ping timed out after {:?}", PING_TIMEOUT);
                false
            }
        }
    }
}

/// Converts to the BSON date type so TTL and range queries see real dates.
pub fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

pub fn from_bson_datetime(dt: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or_default()
}
