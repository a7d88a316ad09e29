//! Gemini `generateContent` client for image generation.
//!
//! Thin HTTP wrapper: builds the request body from a
//! [`GenerationRequest`], posts it, and decodes the first candidate. Body
//! building and response parsing are pure functions for testability.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

use canvas::generation::{DRAWING_MIME_TYPE, GenerationRequest, RequestPart};

use super::config::LlmTimeouts;
use super::types::{Content, ImageResponse, InlineData, LlmError, Part};

const API_KEY_HEADER: &str = "x-goog-api-key";
const RESPONSE_MODALITIES: [&str; 2] = ["TEXT", "IMAGE"];

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    http: reqwest::Client,
    /// Process-wide default key; a per-request override replaces it.
    api_key: Option<String>,
    /// Env var the default key was read from, for error messages.
    api_key_var: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: Option<String>,
        api_key_var: String,
        base_url: String,
        timeouts: LlmTimeouts,
    ) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| LlmError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, api_key_var, base_url })
    }

    /// Pick the credential for a call: a non-empty override wins over the
    /// default key.
    pub fn resolve_key<'a>(&'a self, credential: Option<&'a str>) -> Result<&'a str, LlmError> {
        credential
            .filter(|k| !k.trim().is_empty())
            .or(self.api_key.as_deref())
            .ok_or_else(|| LlmError::MissingApiKey { var: self.api_key_var.clone() })
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<ImageResponse, LlmError> {
        let key = self.resolve_key(request.credential.as_deref())?;
        let body = build_request_body(request);
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::ApiRequest(e.to_string()))?;

        if status != 200 {
            return Err(LlmError::ApiResponse { status, body: text });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 2],
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

// =============================================================================
// REQUEST BUILDING
// =============================================================================

/// Single user turn: inline PNG then text, or text alone.
pub(crate) fn build_request_body(request: &GenerationRequest) -> GenerateContentRequest {
    let parts = request
        .parts()
        .into_iter()
        .map(|part| match part {
            RequestPart::Image { png } => Part::InlineData {
                inline_data: InlineData { mime_type: DRAWING_MIME_TYPE.to_string(), data: BASE64.encode(png) },
            },
            RequestPart::Text(text) => Part::Text { text },
        })
        .collect();

    GenerateContentRequest {
        contents: vec![Content { role: Some("user".into()), parts }],
        generation_config: GenerationConfig { response_modalities: RESPONSE_MODALITIES },
    }
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<ImageResponse, LlmError> {
    let api: GenerateContentResponse = serde_json::from_str(json).map_err(|e| LlmError::ApiParse(e.to_string()))?;

    let Some(content) = api.candidates.into_iter().next().and_then(|c| c.content) else {
        let text = api
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|reason| format!("request blocked: {reason}"));
        return Ok(ImageResponse { text, image: None });
    };

    let mut texts = Vec::new();
    let mut image = None;
    for part in content.parts {
        match part {
            Part::Text { text } => texts.push(text),
            Part::InlineData { inline_data } if image.is_none() && inline_data.mime_type.starts_with("image/") => {
                let bytes = BASE64
                    .decode(inline_data.data.as_bytes())
                    .map_err(|e| LlmError::ApiParse(format!("inline image: {e}")))?;
                image = Some(bytes);
            }
            Part::InlineData { .. } | Part::Other(_) => {}
        }
    }

    let text = if texts.is_empty() { None } else { Some(texts.join("\n")) };
    Ok(ImageResponse { text, image })
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod tests;
