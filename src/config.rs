use std::env;
use std::path::PathBuf;
use anyhow::{Context, Result};
use http::HeaderValue;
use zeroize::Zeroizing;

/// Database used when neither `MONGODB_DATABASE` nor the URI names one.
const DEFAULT_DATABASE: &str = "portfolio";
/// Static bundle served in production when `STATIC_DIR` is not set.
const DEFAULT_PRODUCTION_STATIC_DIR: &str = "frontend/dist";
/// Upper bound for `THEME_DURATION_DAYS` (ten years).
pub const MAX_THEME_DURATION_DAYS: i64 = 3650;

/// Credentials and target of the Google Sheets mirror.
#[derive(Clone)]
pub struct GoogleSheetsConfig {
    /// The spreadsheet receiving one row per contact.
    pub sheet_id: String,
    /// The service account email.
    pub client_email: String,
    /// The service account PEM key, with `\n` escapes expanded.
    pub private_key: Zeroizing<String>,
    /// The A1 range rows are appended to.
    pub range: String,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub host: String,
    /// The port the HTTP server listens on.
    pub port: u16,
    /// The MongoDB connection string.
    pub mongodb_uri: String,
    /// The database holding the `contacts` and `themes` collections.
    pub database_name: String,
    /// Whether the process runs in production (secure cookies, default bundle).
    pub is_production: bool,
    /// Origins allowed to call the API with credentials.
    pub cors_origins: Vec<HeaderValue>,
    /// Directory of the built single-page app, if it should be served.
    pub static_dir: Option<PathBuf>,
    /// Lifetime of a theme preference and its cookie, in days.
    pub theme_duration_days: i64,
    /// The spreadsheet mirror, disabled when any credential is missing.
    pub google_sheets: Option<GoogleSheetsConfig>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("APP_ENV")
            .or_else(|| var("NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());
        let is_production = environment == "production";

        let mongodb_uri = var("MONGODB_URI")
            .unwrap_or_else(|| format!("mongodb://127.0.0.1:27017/{}", DEFAULT_DATABASE));

        let database_name = var("MONGODB_DATABASE")
            .or_else(|| database_from_uri(&mongodb_uri))
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173,http://localhost:3000".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("Invalid origin in CORS_ORIGINS: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        let static_dir = var("STATIC_DIR")
            .or_else(|| is_production.then(|| DEFAULT_PRODUCTION_STATIC_DIR.to_string()))
            .map(PathBuf::from);

        let theme_duration_days: i64 = var("THEME_DURATION_DAYS")
            .unwrap_or_else(|| "30".to_string())
            .parse()
            .context("Invalid THEME_DURATION_DAYS")?;
        if theme_duration_days <= 0 {
            anyhow::bail!("THEME_DURATION_DAYS must be a positive number of days");
        }
        if theme_duration_days > MAX_THEME_DURATION_DAYS {
            anyhow::bail!(
                "THEME_DURATION_DAYS must be at most {} days",
                MAX_THEME_DURATION_DAYS
            );
        }

        let google_sheets = match (
            var("GOOGLE_SHEET_ID"),
            var("GOOGLE_CLIENT_EMAIL"),
            var("GOOGLE_PRIVATE_KEY"),
        ) {
            (Some(sheet_id), Some(client_email), Some(private_key)) => Some(GoogleSheetsConfig {
                sheet_id,
                client_email,
                private_key: Zeroizing::new(private_key.replace("\\n", "\n")),
                range: var("GOOGLE_SHEET_RANGE").unwrap_or_else(|| "Sheet1!A:D".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: var("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse()
                .context("Invalid PORT")?,
            mongodb_uri,
            database_name,
            is_production,
            cors_origins,
            static_dir,
            theme_duration_days,
            google_sheets,
        })
    }
}

/// Extracts the default database from a `mongodb://host/db?opts` URI.
fn database_from_uri(uri: &str) -> Option<String> {
    let without_scheme = uri.split_once("://")?.1;
    let path = without_scheme.split_once('/')?.1;
    let name = path.split('?').next()?;
    (!name.is_empty()).then(|| name.to_string())
}
