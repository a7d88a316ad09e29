//! Generation service: one sketch + prompt round trip for a session.
//!
//! DESIGN
//! ======
//! The engine lock is held only to begin and to finish. The network call
//! runs with the lock released so the session stays readable (and the
//! canvas drawable) while a request is in flight; the engine's busy flag
//! rejects a second submission meanwhile.
//!
//! Everything after `begin` runs in a spawned task that owns its own session
//! handle. The handler only awaits it, so a client that disconnects mid-call
//! cannot leave the session stuck in `Submitting`.
//!
//! Every failure after `begin` is turned into a human-readable message and
//! handed to `finish_generation`, which records it and leaves the surface
//! untouched. There are no retries and no cancellation.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use canvas::engine::Action;
use canvas::generation::{GenerationError, GenerationOutcome, GenerationRequest, Submission, error_message_from_payload};

use crate::llm::ImageGen;
use crate::llm::types::LlmError;
use crate::services::session::{SessionError, SessionHandle};
use crate::state::AppState;

// =============================================================================
// TYPES
// =============================================================================

/// What the caller asked for. `model: None` picks the default.
#[derive(Debug, Clone, Default)]
pub struct GenerateParams {
    pub prompt: String,
    pub similarity: f64,
    pub model: Option<String>,
    pub api_key: Option<String>,
}

/// Errors that stop a request before it reaches the provider.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("unknown model: {0}")]
    UnknownModel(String),
    #[error(transparent)]
    Rejected(#[from] GenerationError),
}

impl crate::error::ErrorCode for GenerateError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Session(e) => e.error_code(),
            Self::UnknownModel(_) => "E_UNKNOWN_MODEL",
            Self::Rejected(GenerationError::EmptyPrompt) => "E_EMPTY_PROMPT",
            Self::Rejected(GenerationError::Busy) => "E_BUSY",
            Self::Rejected(GenerationError::NoImage) => "E_NO_IMAGE",
            Self::Rejected(GenerationError::Surface(_)) => "E_SURFACE",
            Self::Rejected(GenerationError::Service(_)) => "E_SERVICE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Rejected(GenerationError::Busy))
    }
}

/// Settled result of a round trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum GenerateOutcome {
    Succeeded { cursor: usize, len: usize, message: Option<String> },
    Failed { error: String, cursor: usize, len: usize },
}

// =============================================================================
// SERVICE
// =============================================================================

/// Run one generation for `session_id`.
///
/// # Errors
///
/// Returns [`GenerateError`] only when the request never started: unknown
/// session or model, empty prompt, or a request already in flight. Provider
/// failures come back as [`GenerateOutcome::Failed`].
pub async fn generate(state: &AppState, session_id: Uuid, params: GenerateParams) -> Result<GenerateOutcome, GenerateError> {
    let model = state
        .models
        .resolve(params.model.as_deref())
        .ok_or_else(|| GenerateError::UnknownModel(params.model.clone().unwrap_or_default()))?;
    let handle = state.sessions.get(session_id).await?;

    let request = {
        let mut engine = handle.lock().await;
        engine.begin_generation(Submission {
            prompt: params.prompt,
            similarity: params.similarity,
            model,
            credential: params.api_key,
        })?
    };

    info!(
        %session_id,
        model = %request.model,
        similarity = request.similarity,
        with_drawing = request.drawing.is_some(),
        "generation: submitting"
    );

    let task = tokio::spawn(settle(state.image_gen.clone(), handle.clone(), session_id, request));
    match task.await {
        Ok(outcome) => Ok(outcome),
        Err(e) => {
            warn!(%session_id, error = %e, "generation: task failed");
            let mut engine = handle.lock().await;
            engine.finish_generation(Err("generation task failed".into()));
            Ok(GenerateOutcome::Failed {
                error: "generation task failed".into(),
                cursor: engine.cursor(),
                len: engine.history_len(),
            })
        }
    }
}

/// Call the provider with the lock released, then finish under the lock.
async fn settle(image_gen: Arc<dyn ImageGen>, handle: SessionHandle, session_id: Uuid, request: GenerationRequest) -> GenerateOutcome {
    let started = Instant::now();
    let result = image_gen
        .generate(&request)
        .await
        .map(GenerationOutcome::from)
        .map_err(|e| describe_llm_error(&e));
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut engine = handle.lock().await;
    match engine.finish_generation(result) {
        Action::GenerationSucceeded { cursor, len, message } => {
            info!(%session_id, elapsed_ms, cursor, len, "generation: succeeded");
            GenerateOutcome::Succeeded { cursor, len, message }
        }
        Action::GenerationFailed { message } => {
            warn!(%session_id, elapsed_ms, error = %message, "generation: failed");
            GenerateOutcome::Failed { error: message, cursor: engine.cursor(), len: engine.history_len() }
        }
        other => {
            warn!(%session_id, ?other, "generation: settled without an outcome");
            GenerateOutcome::Failed {
                error: "generation was not in flight".into(),
                cursor: engine.cursor(),
                len: engine.history_len(),
            }
        }
    }
}

/// User-facing text for a provider failure. Error bodies from the API are
/// reduced to their `error.message` when they carry one.
#[must_use]
pub fn describe_llm_error(err: &LlmError) -> String {
    match err {
        LlmError::ApiResponse { status, body } if body.trim().is_empty() => format!("request failed with status {status}"),
        LlmError::ApiResponse { body, .. } => error_message_from_payload(body),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
