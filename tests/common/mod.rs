#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use portfolio_api::{
    config::Config,
    db::ConnectionCheck,
    error::{AppError, Result},
    integrations::google_sheets::{ContactMirror, MirrorError},
    models::contact::{Contact, NewContact},
    models::theme::ThemePreference,
    repositories::contact::ContactRepository,
    repositories::theme::ThemeRepository,
    router, AppState,
};

/// Contacts kept in memory. Can be told to fail or panic.
#[derive(Default)]
pub struct MemoryContacts {
    pub rows: Mutex<Vec<Contact>>,
    pub fail_writes: AtomicBool,
    pub panic_on_list: AtomicBool,
    next_id: AtomicUsize,
}

#[async_trait]
impl ContactRepository for MemoryContacts {
    async fn insert(&self, contact: NewContact) -> Result<Contact> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset by peer".to_string()));
        }
        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Contact {
            id: format!("{:024x}", n + 1),
            name: contact.name,
            email: contact.email,
            message: contact.message,
            submitted_at: Utc::now() + Duration::milliseconds(n as i64),
        };
        self.rows.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<Contact>> {
        if self.panic_on_list.load(Ordering::SeqCst) {
            panic!("contact listing exploded");
        }
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(rows)
    }
}

/// Theme preferences kept in memory, with the same `lastUpdated` rule as MongoDB.
#[derive(Default)]
pub struct MemoryThemes {
    pub rows: Mutex<HashMap<String, ThemePreference>>,
}

#[async_trait]
impl ThemeRepository for MemoryThemes {
    async fn find_live(&self, session_id: &str, now: DateTime<Utc>) -> Result<Option<ThemePreference>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(session_id)
            .filter(|p| p.expires_at > now)
            .cloned())
    }

    async fn upsert(
        &self,
        session_id: &str,
        dark_mode: bool,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<ThemePreference> {
        let mut rows = self.rows.lock().unwrap();
        let last_updated = match rows.get(session_id) {
            Some(previous) => now.max(previous.last_updated + Duration::milliseconds(1)),
            None => now,
        };
        let preference = ThemePreference {
            session_id: session_id.to_string(),
            dark_mode,
            expires_at,
            last_updated,
        };
        rows.insert(session_id.to_string(), preference.clone());
        Ok(preference)
    }
}

pub struct FixedStatus(pub bool);

#[async_trait]
impl ConnectionCheck for FixedStatus {
    async fn is_connected(&self) -> bool {
        self.0
    }
}

/// A mirror that always fails and counts its calls.
#[derive(Default)]
pub struct FailingMirror {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ContactMirror for FailingMirror {
    async fn append(&self, _contact: &Contact) -> std::result::Result<(), MirrorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MirrorError::Api {
            status: 403,
            body: "The caller does not have permission".to_string(),
        })
    }
}

pub struct TestContext {
    pub app: Router,
    pub contacts: Arc<MemoryContacts>,
    pub themes: Arc<MemoryThemes>,
    pub mirror: Arc<FailingMirror>,
}

pub fn config_with(vars: &[(&str, &str)]) -> Config {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

impl TestContext {
    pub fn new() -> Self {
        Self::build(config_with(&[]), true, false)
    }

    pub fn with_mirror() -> Self {
        Self::build(config_with(&[]), true, true)
    }

    pub fn build(config: Config, database_up: bool, mirror: bool) -> Self {
        let contacts = Arc::new(MemoryContacts::default());
        let themes = Arc::new(MemoryThemes::default());
        let failing_mirror = Arc::new(FailingMirror::default());

        let state = AppState {
            contacts: contacts.clone(),
            themes: themes.clone(),
            database: Arc::new(FixedStatus(database_up)),
            mirror: mirror.then(|| failing_mirror.clone() as Arc<dyn ContactMirror>),
            config: Arc::new(config),
        };

        Self {
            app: router(state),
            contacts,
            themes,
            mirror: failing_mirror,
        }
    }

    pub async fn send(&self, method: &str, uri: &str, cookie: Option<&str>, body: Option<&str>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn text_body(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Returns the `name=value` pair of the `sessionId` cookie set by a response.
pub fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("sessionId="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

pub fn set_cookie_header(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("sessionId="))
        .map(str::to_string)
}
