//! Theme preference routes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::services::theme::{Theme, ThemeError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ThemeResponse {
    pub theme: Theme,
    pub available: [Theme; 3],
}

#[derive(Deserialize)]
pub struct ThemeBody {
    pub theme: String,
}

fn theme_error(err: ThemeError) -> ApiError {
    let status = match err {
        ThemeError::Unknown(_) => StatusCode::BAD_REQUEST,
        ThemeError::Write(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError::from_code(status, &err)
}

/// `GET /api/theme`
pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(ThemeResponse { theme: state.theme.get().await, available: Theme::ALL })
}

/// `PUT /api/theme`: store a new preference.
pub async fn put_theme(State(state): State<AppState>, Json(body): Json<ThemeBody>) -> Result<Json<ThemeResponse>, ApiError> {
    let theme = state
        .theme
        .set_named(&body.theme)
        .await
        .map_err(theme_error)?;
    Ok(Json(ThemeResponse { theme, available: Theme::ALL }))
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
