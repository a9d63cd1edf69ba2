use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::GoogleSheetsConfig, models::contact::Contact};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
/// Lifetime requested for the service account assertion, in seconds.
const ASSERTION_TTL_SECS: i64 = 3600;

/// Errors raised while mirroring a contact. They are logged, never returned
/// to an API client.
#[derive(Error, Debug)]
pub enum MirrorError {
    /// The service account key could not be used to sign the assertion.
    #[error("Invalid service account key: {0}")]
    Key(#[from] jsonwebtoken::errors::Error),

    /// The request never produced a usable response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Google answered with a non-success status.
    #[error("Google API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// A side copy of stored contacts, run after the database write committed.
#[async_trait]
pub trait ContactMirror: Send + Sync {
    async fn append(&self, contact: &Contact) -> Result<(), MirrorError>;
}

/// Runs the mirror for a contact that is already persisted.
///
/// Failures are logged and dropped; the caller's outcome never depends on them.
pub async fn run_post_commit(mirror: Option<&dyn ContactMirror>, contact: &Contact) {
    let Some(mirror) = mirror else {
        tracing::debug!("Google Sheets mirror disabled, skipping contact {}", contact.id);
        return;
    };

    match mirror.append(contact).await {
        Ok(()) => tracing::info!("✅ Contact {} added to Google Sheet", contact.id),
        Err(e) => tracing::warn!("⚠️ Failed to add contact {} to Google Sheet: {}", contact.id, e),
    }
}

/// Formats a timestamp the way the sheet expects it: `M/D/YYYY, h:mm:ss AM`, UTC.
pub fn format_submitted_at(submitted_at: DateTime<Utc>) -> String {
    submitted_at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// The row appended for a contact: name, email, message, submission time.
pub fn contact_row(contact: &Contact) -> Vec<String> {
    vec![
        contact.name.clone(),
        contact.email.clone(),
        contact.message.clone(),
        format_submitted_at(contact.submitted_at),
    ]
}

#[derive(Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Serialize)]
struct AppendBody {
    values: Vec<Vec<String>>,
}

/// Appends contacts to a Google Sheet using a service account.
pub struct GoogleSheetsMirror {
    http: reqwest::Client,
    config: GoogleSheetsConfig,
}

impl GoogleSheetsMirror {
    pub fn new(config: GoogleSheetsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Exchanges a signed service account assertion for an access token.
    async fn access_token(&self) -> Result<String, MirrorError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            iss: &self.config.client_email,
            scope: SHEETS_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let key = EncodingKey::from_rsa_pem(self.config.private_key.as_bytes())?;
        let assertion = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?;

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;
        let token: TokenResponse = ensure_success(response).await?.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl ContactMirror for GoogleSheetsMirror {
    async fn append(&self, contact: &Contact) -> Result<(), MirrorError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/{}/values/{}:append",
            SHEETS_API_BASE, self.config.sheet_id, self.config.range
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&AppendBody {
                values: vec![contact_row(contact)],
            })
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, MirrorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(MirrorError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use zeroize::Zeroizing;

    fn contact() -> Contact {
        Contact {
            id: "65f0c0ffee0000000000beef".to_string(),
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            message: "Hello there".to_string(),
            submitted_at: Utc.with_ymd_and_hms(2024, 3, 7, 15, 4, 5).unwrap(),
        }
    }

    #[test]
    fn submitted_at_uses_us_locale_layout() {
        let afternoon = Utc.with_ymd_and_hms(2024, 3, 7, 15, 4, 5).unwrap();
        assert_eq!(format_submitted_at(afternoon), "3/7/2024, 3:04:05 PM");

        let midnight = Utc.with_ymd_and_hms(2024, 12, 25, 0, 30, 0).unwrap();
        assert_eq!(format_submitted_at(midnight), "12/25/2024, 12:30:00 AM");
    }

    #[test]
    fn row_has_four_columns_in_order() {
        assert_eq!(
            contact_row(&contact()),
            vec![
                "Ada Lovelace".to_string(),
                "ada@example.com".to_string(),
                "Hello there".to_string(),
                "3/7/2024, 3:04:05 PM".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn invalid_key_fails_before_any_request() {
        let mirror = GoogleSheetsMirror::new(GoogleSheetsConfig {
            sheet_id: "sheet".to_string(),
            client_email: "svc@project.iam.gserviceaccount.com".to_string(),
            private_key: Zeroizing::new("not a pem key".to_string()),
            range: "Sheet1!A:D".to_string(),
        });

        assert!(matches!(mirror.append(&contact()).await, Err(MirrorError::Key(_))));
    }

    struct CountingFailure(AtomicUsize);

    #[async_trait]
    impl ContactMirror for CountingFailure {
        async fn append(&self, _contact: &Contact) -> Result<(), MirrorError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(MirrorError::Api {
                status: 503,
                body: "backend unavailable".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn post_commit_swallows_failures() {
        let mirror = CountingFailure(AtomicUsize::new(0));
        run_post_commit(Some(&mirror), &contact()).await;
        assert_eq!(mirror.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn post_commit_without_mirror_is_a_no_op() {
        run_post_commit(None, &contact()).await;
    }
}
