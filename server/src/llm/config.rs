//! Image-generation configuration parsed from environment variables.

use super::types::LlmError;

pub const DEFAULT_API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-preview-image-generation";
pub const DEFAULT_MODELS: [&str; 2] = [DEFAULT_MODEL, "gemini-2.0-flash-exp"];
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmConfig {
    /// Default credential. `None` is allowed: every request must then carry
    /// its own key.
    pub api_key: Option<String>,
    pub api_key_var: String,
    pub model: String,
    /// Models a client may select. Always contains `model`.
    pub models: Vec<String>,
    pub base_url: String,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `GEMINI_API_KEY_ENV`: names the env var holding the key (default `GEMINI_API_KEY`)
    /// - `GEMINI_MODEL`: default model
    /// - `GEMINI_MODELS`: comma-separated selectable models
    /// - `GEMINI_BASE_URL`: API base URL
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 120
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigParse`] if a timeout is set but not a number.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigParse`] if a timeout is set but not a number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LlmError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key_var = get("GEMINI_API_KEY_ENV").unwrap_or_else(|| DEFAULT_API_KEY_VAR.to_string());
        let api_key = get(&api_key_var);

        let model = get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let mut models = get("GEMINI_MODELS").map_or_else(
            || DEFAULT_MODELS.iter().map(ToString::to_string).collect(),
            |raw| parse_model_list(&raw),
        );
        if !models.contains(&model) {
            models.insert(0, model.clone());
        }

        let base_url = get("GEMINI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let timeouts = LlmTimeouts {
            request_secs: parse_u64(get("LLM_REQUEST_TIMEOUT_SECS"), "LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS)?,
            connect_secs: parse_u64(get("LLM_CONNECT_TIMEOUT_SECS"), "LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS)?,
        };

        Ok(Self { api_key, api_key_var, model, models, base_url, timeouts })
    }
}

fn parse_model_list(raw: &str) -> Vec<String> {
    let mut models: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !models.iter().any(|m| m == name) {
            models.push(name.to_string());
        }
    }
    models
}

fn parse_u64(raw: Option<String>, key: &str, default: u64) -> Result<u64, LlmError> {
    match raw {
        None => Ok(default),
        Some(v) => v
            .parse::<u64>()
            .map_err(|_| LlmError::ConfigParse(format!("{key} must be a whole number of seconds, got '{v}'"))),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
