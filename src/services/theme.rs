use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::theme::ThemePreference,
    state::AppState,
};

/// Mints a new opaque session id.
///
/// # Returns
///
/// A random UUID v4 rendered as a string.
pub fn mint_session_id() -> String {
    Uuid::new_v4().to_string()
}

/// Looks up the stored preference for a session.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session_id` - The session id read from the `sessionId` cookie.
///
/// # Returns
///
/// A `Result` containing the stored `darkMode`, or `None` when the session
/// has no live record.
pub async fn find_preference(state: &AppState, session_id: &str) -> Result<Option<bool>> {
    let preference = state.themes.find_live(session_id, Utc::now()).await?;
    Ok(preference.map(|p| p.dark_mode))
}

/// Creates or refreshes the preference of a session, extending its expiry.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `session_id` - The existing or freshly minted session id.
/// * `dark_mode` - The coerced preference.
///
/// # Returns
///
/// A `Result` containing the stored `ThemePreference`.
pub async fn save_preference(
    state: &AppState,
    session_id: &str,
    dark_mode: bool,
) -> Result<ThemePreference> {
    let now = Utc::now();
    let expires_at = expires_after(now, state.config.theme_duration_days)?;

    let preference = state
        .themes
        .upsert(session_id, dark_mode, now, expires_at)
        .await?;
    tracing::info!(
        "✅ Theme preference saved for session {}: darkMode={}",
        session_id,
        dark_mode
    );

    Ok(preference)
}

/// Computes the expiry of a preference written at `now`.
///
/// Out-of-range durations are an error rather than a chrono overflow panic.
pub fn expires_after(now: DateTime<Utc>, duration_days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(duration_days)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Theme duration of {} days overflows the expiry timestamp",
                duration_days
            ))
        })
}
