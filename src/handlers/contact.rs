use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    error::Result,
    extract::ApiJson,
    models::contact::Contact,
    services::contact as contact_service,
    state::AppState,
    validation::contact::ContactRequest,
};

/// The response payload for a stored contact submission.
#[derive(Serialize)]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub contact: Contact,
}

/// Handles a contact form submission.
#[axum::debug_handler]
pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ContactRequest>,
) -> Result<Response> {
    tracing::info!("📨 Contact submission received");

    let contact = contact_service::submit_contact(&state, payload).await?;

    let response = ContactResponse {
        success: true,
        message: "Thank you for your message! I'll get back to you soon.".to_string(),
        contact,
    };

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// Lists every contact submission, newest first.
#[axum::debug_handler]
pub async fn list_contacts(State(state): State<AppState>) -> Result<Json<Vec<Contact>>> {
    let contacts = contact_service::list_contacts(&state).await?;
    Ok(Json(contacts))
}
