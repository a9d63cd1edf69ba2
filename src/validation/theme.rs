use serde::{de::IgnoredAny, Deserialize};

use crate::error::{AppError, Result};

/// The request payload for saving a theme preference.
#[derive(Deserialize, Debug, Default)]
pub struct ThemeRequest {
    #[serde(rename = "darkMode", default)]
    pub dark_mode: Option<DarkModeInput>,
}

/// The shapes a client may send for `darkMode`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum DarkModeInput {
    Flag(bool),
    Text(String),
    Other(IgnoredAny),
}

/// Coerces `darkMode` to a boolean.
///
/// Accepts JSON booleans and the exact strings `"true"` and `"false"`.
///
/// # Arguments
///
/// * `input` - The `darkMode` value as sent, if any.
///
/// # Returns
///
/// A `Result` containing the boolean preference, or `AppError::Validation`
/// when the value is missing or has any other shape.
pub fn coerce_dark_mode(input: Option<DarkModeInput>) -> Result<bool> {
    match input {
        Some(DarkModeInput::Flag(value)) => Ok(value),
        Some(DarkModeInput::Text(text)) => match text.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(AppError::Validation(
                "darkMode must be true or false".to_string(),
            )),
        },
        Some(DarkModeInput::Other(_)) => Err(AppError::Validation(
            "darkMode must be true or false".to_string(),
        )),
        None => Err(AppError::Validation("darkMode is required".to_string())),
    }
}
