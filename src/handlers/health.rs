use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

pub const DATABASE_CONNECTED: &str = "Connected to MongoDB";
pub const DATABASE_DISCONNECTED: &str = "Disconnected from MongoDB";

/// The response payload of the health check.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}

/// Reports process liveness and database connectivity. Never fails.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = if state.database.is_connected().await {
        DATABASE_CONNECTED
    } else {
        DATABASE_DISCONNECTED
    };

    Json(HealthResponse {
        status: "Backend is running!",
        database,
        timestamp: Utc::now().to_rfc3339(),
    })
}
