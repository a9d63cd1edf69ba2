use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A MongoDB driver error.
    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// A document could not be converted to BSON.
    #[error("BSON serialization error: {0}")]
    BsonSerialization(#[from] bson::ser::Error),

    /// A stored document could not be read back.
    #[error("BSON deserialization error: {0}")]
    BsonDeserialization(#[from] bson::de::Error),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No route matched the request.
    #[error("Route not found")]
    NotFound,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

/// The JSON envelope returned for every failed API request.
#[derive(Serialize)]
pub struct ErrorBody<'a> {
    pub success: bool,
    pub error: &'a str,
    pub timestamp: String,
}

impl AppError {
    /// The status code and the message that is safe to show to a client.
    fn public_parts(&self) -> (StatusCode, String) {
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::BsonSerialization(e) => {
                tracing::error!("BSON serialization error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::BsonDeserialization(e) => {
                tracing::error!("BSON deserialization error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }

            AppError::Validation(msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::NotFound => {
                tracing::debug!("Route not found");
                (StatusCode::NOT_FOUND, "Route not found".to_string())
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        }
    }
}

/// Renders the error envelope with the given status.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = sonic_rs::to_string(&ErrorBody {
        success: false,
        error: message,
        timestamp: Utc::now().to_rfc3339(),
    })
    .unwrap_or_else(|_| r#"{"success":false,"error":"Internal server error"}"#.to_string());

    (
        status,
        [(http::header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.public_parts();
        error_response(status, &message)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}
