use axum::{extract::State, Json};
use serde::Serialize;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    error::Result,
    extract::ApiJson,
    services::theme as theme_service,
    state::AppState,
    validation::theme::{coerce_dark_mode, ThemeRequest},
};

/// The cookie carrying the theme session id.
pub const SESSION_COOKIE: &str = "sessionId";

/// The response payload for reading a theme preference.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ThemeResponse {
    pub dark_mode: Option<bool>,
    pub session_id: Option<String>,
}

/// The response payload for saving a theme preference.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveThemeResponse {
    pub success: bool,
    pub message: String,
    pub session_id: String,
    pub dark_mode: bool,
}

/// Creates the HTTP-only session cookie.
fn create_session_cookie(value: String, max_age_days: i64, secure: bool) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, value);

    cookie.set_http_only(true);
    if secure {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(max_age_days.saturating_mul(86_400)));
    cookie.set_path("/");

    cookie
}

/// Reads the session id from the request cookie, ignoring empty values.
fn session_from_cookie(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Returns the theme preference of the caller's session.
#[axum::debug_handler]
pub async fn get_theme(
    State(state): State<AppState>,
    cookies: Cookies,
) -> Result<Json<ThemeResponse>> {
    let Some(session_id) = session_from_cookie(&cookies) else {
        tracing::debug!("No session cookie, theme preference unknown");
        return Ok(Json(ThemeResponse {
            dark_mode: None,
            session_id: None,
        }));
    };

    let dark_mode = theme_service::find_preference(&state, &session_id).await?;

    Ok(Json(ThemeResponse {
        dark_mode,
        session_id: Some(session_id),
    }))
}

/// Saves the theme preference of the caller's session, minting one if needed.
#[axum::debug_handler]
pub async fn save_theme(
    State(state): State<AppState>,
    cookies: Cookies,
    ApiJson(payload): ApiJson<ThemeRequest>,
) -> Result<Json<SaveThemeResponse>> {
    let dark_mode = coerce_dark_mode(payload.dark_mode)?;

    let session_id = match session_from_cookie(&cookies) {
        Some(existing) => existing,
        None => {
            let minted = theme_service::mint_session_id();
            tracing::debug!("🔑 Generated session_id: {}", minted);
            minted
        }
    };

    let preference = theme_service::save_preference(&state, &session_id, dark_mode).await?;

    cookies.add(create_session_cookie(
        preference.session_id.clone(),
        state.config.theme_duration_days,
        state.config.is_production,
    ));

    Ok(Json(SaveThemeResponse {
        success: true,
        message: "Theme preference saved".to_string(),
        session_id: preference.session_id,
        dark_mode: preference.dark_mode,
    }))
}
