use std::sync::Arc;

use crate::config::Config;
use crate::db::{self, ConnectionCheck, MongoPing};
use crate::error::Result;
use crate::integrations::google_sheets::{ContactMirror, GoogleSheetsMirror};
use crate::repositories::contact::{ContactRepository, MongoContactRepository};
use crate::repositories::theme::{MongoThemeRepository, ThemeRepository};

/// The application's state, built once at startup and shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Contact submissions.
    pub contacts: Arc<dyn ContactRepository>,
    /// Theme preferences.
    pub themes: Arc<dyn ThemeRepository>,
    /// Database liveness, used by the health check.
    pub database: Arc<dyn ConnectionCheck>,
    /// The post-commit contact mirror, `None` when not configured.
    pub mirror: Option<Arc<dyn ContactMirror>>,
    /// The application's configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new `AppState` backed by MongoDB.
    ///
    /// An unreachable database is logged and tolerated; only an unusable
    /// connection string is an error.
    pub async fn new(config: &Config) -> Result<Self> {
        let database = db::connect(&config.mongodb_uri, &config.database_name).await?;
        let ping = MongoPing::new(database.clone());

        if ping.is_connected().await {
            tracing::info!("✅ Connected to MongoDB database '{}'", config.database_name);
            match db::ensure_indexes(&database).await {
                Ok(()) => tracing::info!("✅ MongoDB indexes ensured"),
                Err(e) => tracing::warn!("⚠️ Could not ensure MongoDB indexes: {}", e),
            }
        } else {
            tracing::warn!(
                "⚠️ MongoDB is not reachable; starting anyway, health will report it as disconnected"
            );
        }

        let mirror: Option<Arc<dyn ContactMirror>> = match &config.google_sheets {
            Some(sheets) => {
                tracing::info!("✅ Google Sheets mirror enabled for sheet {}", sheets.sheet_id);
                Some(Arc::new(GoogleSheetsMirror::new(sheets.clone())))
            }
            None => {
                tracing::warn!("⚠️ Google Sheets not configured; contacts will only be stored in MongoDB");
                None
            }
        };

        Ok(AppState {
            contacts: Arc::new(MongoContactRepository::new(&database)),
            themes: Arc::new(MongoThemeRepository::new(&database)),
            database: Arc::new(ping),
            mirror,
            config: Arc::new(config.clone()),
        })
    }
}
