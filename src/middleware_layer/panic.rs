use std::any::Any;

use axum::{http::StatusCode, response::Response};

use crate::error::error_response;

/// Turns a handler panic into the generic 500 error envelope.
///
/// Installed through `CatchPanicLayer::custom`, outside every route.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!("❌ Handler panicked: {}", detail);

    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
