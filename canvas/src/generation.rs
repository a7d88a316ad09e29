//! Generation request lifecycle.
//!
//! A submission walks `Idle → Submitting → {Succeeded, Failed} → Idle`. The
//! controller ([`crate::engine::EngineCore`]) drives the transitions; this
//! module holds the request and outcome types and the error-message rules.
//! The network call itself lives with the host.

#[cfg(test)]
#[path = "generation_test.rs"]
mod generation_test;

use serde::{Deserialize, Serialize};

use crate::similarity;
use crate::surface::SurfaceError;

/// MIME type of the drawing attached to a request.
pub const DRAWING_MIME_TYPE: &str = "image/png";

/// Where the generation state machine currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationPhase {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// What the user asked for. Built by the host from form input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub prompt: String,
    pub similarity: f64,
    pub model: String,
    /// Per-session credential that replaces the default one when present.
    #[serde(default)]
    pub credential: Option<String>,
}

/// A fully-built request, ready for the generation client.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    /// PNG of the flattened surface. `None` for a blank surface.
    pub drawing: Option<Vec<u8>>,
    pub similarity: f64,
    pub model: String,
    pub credential: Option<String>,
}

/// One ordered piece of the request content.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestPart<'a> {
    /// The drawing, as PNG bytes.
    Image { png: &'a [u8] },
    /// The prompt with similarity instruction and style directive.
    Text(String),
}

impl GenerationRequest {
    /// The text part: prompt, similarity instruction, style directive.
    #[must_use]
    pub fn instruction_text(&self) -> String {
        similarity::compose_prompt(&self.prompt, self.similarity)
    }

    /// Ordered request parts: the image then the text when a drawing exists,
    /// otherwise the text alone.
    #[must_use]
    pub fn parts(&self) -> Vec<RequestPart<'_>> {
        match &self.drawing {
            Some(png) => vec![RequestPart::Image { png }, RequestPart::Text(self.instruction_text())],
            None => vec![RequestPart::Text(self.instruction_text())],
        }
    }
}

/// What the service returned for a settled call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutcome {
    /// Accompanying text, kept as an informational message.
    pub text: Option<String>,
    /// Raw image bytes (any format the decoder understands).
    pub image: Option<Vec<u8>>,
}

/// Errors from starting or settling a generation.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// The prompt was empty or whitespace.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// A request is already in flight for this canvas.
    #[error("a generation request is already in progress")]
    Busy,

    /// The service answered without any image.
    #[error("the model returned no image")]
    NoImage,

    /// The surface could not be encoded or the returned image decoded.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// The call itself failed; the message is already human-readable.
    #[error("{0}")]
    Service(String),
}

/// Human-readable message for a raw error payload.
///
/// Payloads shaped like `{"error": {"message": "..."}}` yield the inner
/// message; anything else is returned verbatim.
#[must_use]
pub fn error_message_from_payload(raw: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Inner,
    }
    #[derive(Deserialize)]
    struct Inner {
        message: String,
    }

    match serde_json::from_str::<Envelope>(raw.trim()) {
        Ok(envelope) if !envelope.error.message.trim().is_empty() => envelope.error.message,
        _ => raw.to_owned(),
    }
}
