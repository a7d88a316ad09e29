//! LLM types: Gemini wire types, the image-generation trait, and errors.
//!
//! Wire types mirror the `generateContent` REST shapes: a request is a list of
//! `Content` turns, each a list of `Part`s that are either text or inline
//! base64 media. The same `Part` type decodes response candidates.

use serde::{Deserialize, Serialize};

use canvas::generation::{GenerationOutcome, GenerationRequest};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by image-generation client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// No credential: the default key is unset and no override was given.
    #[error("missing API key: env var {var} not set and no key supplied")]
    MissingApiKey { var: String },

    /// The HTTP request to the provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl crate::error::ErrorCode for LlmError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingApiKey { .. } => "E_MISSING_API_KEY",
            Self::ApiRequest(_) => "E_API_REQUEST",
            Self::ApiResponse { .. } => "E_API_RESPONSE",
            Self::ApiParse(_) => "E_API_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::ApiRequest(_) | Self::ApiResponse { status: 429 | 500..=599, .. })
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

/// A conversation turn in a request or a response candidate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// Text or inline media. Variant order matters for untagged decoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Any part kind this client does not use (function calls, etc.).
    Other(serde_json::Value),
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Decoded result of one generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageResponse {
    /// Text parts of the first candidate, joined by newlines.
    pub text: Option<String>,
    /// First inline image of the first candidate, base64-decoded.
    pub image: Option<Vec<u8>>,
}

impl From<ImageResponse> for GenerationOutcome {
    fn from(resp: ImageResponse) -> Self {
        Self { text: resp.text, image: resp.image }
    }
}

// =============================================================================
// IMAGE GENERATION TRAIT
// =============================================================================

/// Provider-neutral async trait for image generation. Enables mocking in tests.
#[async_trait::async_trait]
pub trait ImageGen: Send + Sync {
    /// Send a generation request.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if no credential is available, the request
    /// fails, or the response is malformed.
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageResponse, LlmError>;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
