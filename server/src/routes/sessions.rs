//! Canvas session routes: lifecycle, pointer input, pen, and history.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Json, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use canvas::engine::{Action, EngineCore};
use canvas::generation::DRAWING_MIME_TYPE;
use canvas::input::PointerEvent;
use canvas::surface::SurfaceError;
use canvas::viewport::Viewport;

use crate::error::ApiError;
use crate::services::session::{SessionError, SessionView};
use crate::state::AppState;

/// Result of an input or history call, with the state after it.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub action: Action,
    /// Whether the host should cancel default touch scrolling.
    pub suppress_scroll: bool,
    pub session: SessionView,
}

#[derive(Deserialize, Default)]
pub struct PenBody {
    pub color: Option<String>,
    pub width: Option<f64>,
    pub display_width: Option<f64>,
    pub display_height: Option<f64>,
}

pub(crate) fn session_error(err: SessionError) -> ApiError {
    let status = match &err {
        SessionError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionError::Surface(SurfaceError::InvalidColor(_) | SurfaceError::InvalidSize { .. }) => {
            StatusCode::BAD_REQUEST
        }
        SessionError::Surface(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError::from_code(status, &err)
}

fn surface_error(err: SurfaceError) -> ApiError {
    session_error(SessionError::Surface(err))
}

/// `POST /api/sessions`: create a session with a blank canvas.
pub async fn create_session(State(state): State<AppState>) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let id = state
        .sessions
        .create(state.session_shape)
        .await
        .map_err(session_error)?;
    let handle = state.sessions.get(id).await.map_err(session_error)?;
    let engine = handle.lock().await;
    tracing::info!(%id, width = engine.surface().width(), height = engine.surface().height(), "session created");
    Ok((StatusCode::CREATED, Json(SessionView::of(id, &engine))))
}

/// `GET /api/sessions/:id`: current session state.
pub async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.get(id).await.map_err(session_error)?;
    let engine = handle.lock().await;
    Ok(Json(SessionView::of(id, &engine)))
}

/// `DELETE /api/sessions/:id`: drop a session and its history.
pub async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.sessions.remove(id).await.map_err(session_error)?;
    tracing::info!(%id, "session deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/sessions/:id/canvas.png`: the live surface as PNG.
pub async fn canvas_png(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    let handle = state.sessions.get(id).await.map_err(session_error)?;
    let png = handle.lock().await.render_png().map_err(surface_error)?;
    Ok(([(CONTENT_TYPE, DRAWING_MIME_TYPE), (CACHE_CONTROL, "no-store")], png).into_response())
}

/// `POST /api/sessions/:id/pointer`: feed one pointer event.
pub async fn pointer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<PointerEvent>,
) -> Result<Json<ActionResponse>, ApiError> {
    let handle = state.sessions.get(id).await.map_err(session_error)?;
    let mut engine = handle.lock().await;
    let action = engine.on_pointer(event).map_err(surface_error)?;
    let suppress_scroll = engine.suppresses_scroll(event.source);
    Ok(Json(ActionResponse { action, suppress_scroll, session: SessionView::of(id, &engine) }))
}

/// `POST /api/sessions/:id/pen`: change color, width, or display size.
///
/// An invalid color rejects the whole body; nothing is applied.
pub async fn pen(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PenBody>,
) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.get(id).await.map_err(session_error)?;
    let mut engine = handle.lock().await;
    if let Some(color) = body.color.as_deref() {
        engine.set_pen_color(color).map_err(surface_error)?;
    }
    if let Some(width) = body.width {
        engine.set_line_width(width);
    }
    if body.display_width.is_some() || body.display_height.is_some() {
        engine.set_viewport(Viewport { display_width: body.display_width, display_height: body.display_height });
    }
    Ok(Json(SessionView::of(id, &engine)))
}

async fn history_op(
    state: &AppState,
    id: Uuid,
    op: fn(&mut EngineCore) -> Result<Action, SurfaceError>,
) -> Result<Json<ActionResponse>, ApiError> {
    let handle = state.sessions.get(id).await.map_err(session_error)?;
    let mut engine = handle.lock().await;
    let action = op(&mut *engine).map_err(surface_error)?;
    Ok(Json(ActionResponse { action, suppress_scroll: false, session: SessionView::of(id, &engine) }))
}

/// `POST /api/sessions/:id/undo`
pub async fn undo(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ActionResponse>, ApiError> {
    history_op(&state, id, EngineCore::undo).await
}

/// `POST /api/sessions/:id/redo`
pub async fn redo(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ActionResponse>, ApiError> {
    history_op(&state, id, EngineCore::redo).await
}

/// `POST /api/sessions/:id/clear`
pub async fn clear(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ActionResponse>, ApiError> {
    history_op(&state, id, EngineCore::clear).await
}

/// `DELETE /api/sessions/:id/error`: dismiss the last generation error.
pub async fn dismiss_error(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<SessionView>, ApiError> {
    let handle = state.sessions.get(id).await.map_err(session_error)?;
    let mut engine = handle.lock().await;
    engine.dismiss_error();
    Ok(Json(SessionView::of(id, &engine)))
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
