//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! JSON API under `/api`, a health probe, and optionally a static front end
//! served from a directory as the fallback.

pub mod generate;
pub mod sessions;
pub mod theme;

use std::path::Path;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// API routes with CORS and request tracing.
fn api_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/{id}", get(sessions::get_session).delete(sessions::delete_session))
        .route("/api/sessions/{id}/canvas.png", get(sessions::canvas_png))
        .route("/api/sessions/{id}/pointer", post(sessions::pointer))
        .route("/api/sessions/{id}/pen", post(sessions::pen))
        .route("/api/sessions/{id}/undo", post(sessions::undo))
        .route("/api/sessions/{id}/redo", post(sessions::redo))
        .route("/api/sessions/{id}/clear", post(sessions::clear))
        .route("/api/sessions/{id}/error", delete(sessions::dismiss_error))
        .route("/api/sessions/{id}/generate", post(generate::generate))
        .route("/api/models", get(generate::list_models))
        .route("/api/theme", get(theme::get_theme).put(theme::put_theme))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Full application router. `static_dir`, when given, serves the front end
/// for every path the API does not claim.
pub fn app(state: AppState, static_dir: Option<&Path>) -> Router {
    let router = api_routes(state);
    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true)),
        None => router,
    }
}

async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "sessions": state.sessions.count().await }))
}
