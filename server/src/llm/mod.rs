//! LLM: Gemini image-generation adapter.
//!
//! DESIGN
//! ======
//! `LlmClient` owns the configured HTTP client plus the list of models a
//! session may pick from. Everything above this module talks to it through
//! the [`ImageGen`] trait so tests can swap in a mock.

pub mod config;
pub mod gemini;
pub mod types;

use canvas::generation::GenerationRequest;
use config::LlmConfig;
pub use types::ImageGen;
use types::{ImageResponse, LlmError};

// =============================================================================
// CLIENT
// =============================================================================

/// Configured image-generation client.
pub struct LlmClient {
    inner: gemini::GeminiClient,
    model: String,
    models: Vec<String>,
}

impl LlmClient {
    /// Build a client from environment variables. See [`LlmConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if config parsing or the HTTP client build fails.
    /// A missing API key is not an error here.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_config(LlmConfig::from_env()?)
    }

    /// Build a client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = gemini::GeminiClient::new(config.api_key, config.api_key_var, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model, models: config.models })
    }

    /// Default model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Selectable model names, default first unless configured otherwise.
    #[must_use]
    pub fn models(&self) -> &[String] {
        &self.models
    }
}

#[async_trait::async_trait]
impl ImageGen for LlmClient {
    async fn generate(&self, request: &GenerationRequest) -> Result<ImageResponse, LlmError> {
        self.inner.generate(request).await
    }
}
