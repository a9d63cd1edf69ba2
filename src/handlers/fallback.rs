use axum::http::Uri;

use crate::error::AppError;

/// Answers every unmatched route with the 404 error envelope.
pub async fn not_found(uri: Uri) -> AppError {
    tracing::debug!("No route for {}", uri);
    AppError::NotFound
}
