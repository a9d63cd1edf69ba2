use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use http::{header, Method};
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{handlers, middleware_layer, state::AppState};

/// Largest JSON body accepted by the API.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the full application router.
///
/// `/api/*` routes answer JSON and fall back to a 404 envelope. Every other
/// path is served from the static bundle when one is configured, with
/// `index.html` as the client-side routing fallback.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/contact", post(handlers::contact::submit_contact))
        .route("/contacts", get(handlers::contact::list_contacts))
        .route(
            "/theme",
            get(handlers::theme::get_theme).post(handlers::theme::save_theme),
        )
        .route("/health", get(handlers::health::health))
        .fallback(handlers::fallback::not_found);

    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origins.clone())
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(86400));

    let app = Router::new().nest("/api", api_routes);

    let app = match &state.config.static_dir {
        Some(dir) => {
            tracing::info!("📦 Serving single-page app from {}", dir.display());
            let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
            app.fallback_service(spa)
        }
        None => app.fallback(handlers::fallback::not_found),
    };

    app.layer(CookieManagerLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true))
                .on_request(DefaultOnRequest::default().level(Level::DEBUG))
                .on_response(DefaultOnResponse::default().level(Level::DEBUG))
                .on_failure(DefaultOnFailure::default().level(Level::ERROR)),
        )
        .layer(CatchPanicLayer::custom(middleware_layer::panic::handle_panic))
        .layer(cors)
        .with_state(state)
}
