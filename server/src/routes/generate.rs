//! Generation and model-catalog routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Deserialize;
use uuid::Uuid;

use canvas::consts::DEFAULT_SIMILARITY;
use canvas::generation::GenerationError;

use crate::error::ApiError;
use crate::services::generate::{self, GenerateError, GenerateOutcome, GenerateParams};
use crate::services::session::SessionError;
use crate::state::{AppState, ModelCatalog};

#[derive(Deserialize)]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default = "default_similarity")]
    pub similarity: f64,
    pub model: Option<String>,
    /// Replaces the server's default key for this request only.
    pub api_key: Option<String>,
}

fn default_similarity() -> f64 {
    DEFAULT_SIMILARITY
}

pub(crate) fn generate_error(err: GenerateError) -> ApiError {
    let status = match &err {
        GenerateError::Session(SessionError::NotFound(_)) => StatusCode::NOT_FOUND,
        GenerateError::UnknownModel(_) | GenerateError::Rejected(GenerationError::EmptyPrompt) => StatusCode::BAD_REQUEST,
        GenerateError::Rejected(GenerationError::Busy) => StatusCode::CONFLICT,
        GenerateError::Session(_) | GenerateError::Rejected(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    ApiError::from_code(status, &err)
}

/// `POST /api/sessions/:id/generate`: send the sketch and prompt to the model.
///
/// Responds once the round trip settles. Provider failures are a `200` with
/// `status: "failed"`; only requests that never started are errors.
pub async fn generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<GenerateBody>,
) -> Result<Json<GenerateOutcome>, ApiError> {
    let params = GenerateParams {
        prompt: body.prompt,
        similarity: body.similarity,
        model: body.model,
        api_key: body.api_key,
    };
    generate::generate(&state, id, params)
        .await
        .map(Json)
        .map_err(generate_error)
}

/// `GET /api/models`: selectable models and the default.
pub async fn list_models(State(state): State<AppState>) -> Json<ModelCatalog> {
    Json(state.models.as_ref().clone())
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
