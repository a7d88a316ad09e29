//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the live canvas sessions, the image-generation client, the
//! selectable models, and the theme preference.

use std::sync::Arc;

use serde::Serialize;

use crate::config::AppConfig;
use crate::llm::ImageGen;
use crate::services::session::{SessionShape, SessionStore};
use crate::services::theme::ThemeStore;

// =============================================================================
// MODEL CATALOG
// =============================================================================

/// Models a client may request, and the one used when it names none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelCatalog {
    pub default: String,
    pub available: Vec<String>,
}

impl ModelCatalog {
    /// Catalog with `default` guaranteed to be selectable.
    #[must_use]
    pub fn new(default: impl Into<String>, available: Vec<String>) -> Self {
        let default = default.into();
        let mut available = available;
        if !available.contains(&default) {
            available.insert(0, default.clone());
        }
        Self { default, available }
    }

    /// Resolve a requested model: blank means the default, unknown is `None`.
    #[must_use]
    pub fn resolve(&self, requested: Option<&str>) -> Option<String> {
        match requested.map(str::trim).filter(|m| !m.is_empty()) {
            None => Some(self.default.clone()),
            Some(m) => self.available.iter().find(|a| *a == m).cloned(),
        }
    }
}

// =============================================================================
// APP STATE
// =============================================================================

/// Shared application state. Clone is required by Axum; all inner fields are
/// Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub image_gen: Arc<dyn ImageGen>,
    pub models: Arc<ModelCatalog>,
    pub theme: Arc<ThemeStore>,
    pub session_shape: SessionShape,
}

impl AppState {
    #[must_use]
    pub fn new(config: &AppConfig, image_gen: Arc<dyn ImageGen>, models: ModelCatalog, theme: ThemeStore) -> Self {
        Self {
            sessions: SessionStore::new(),
            image_gen,
            models: Arc::new(models),
            theme: Arc::new(theme),
            session_shape: config.session,
        }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;

    use canvas::generation::GenerationRequest;
    use uuid::Uuid;

    use super::*;
    use crate::llm::types::{ImageResponse, LlmError};

    /// Scripted `ImageGen`: pops one reply per call and records each request.
    pub struct MockImageGen {
        replies: Mutex<Vec<Result<ImageResponse, LlmError>>>,
        pub requests: Mutex<Vec<GenerationRequest>>,
    }

    impl MockImageGen {
        #[must_use]
        pub fn new(replies: Vec<Result<ImageResponse, LlmError>>) -> Self {
            Self { replies: Mutex::new(replies), requests: Mutex::new(Vec::new()) }
        }

        #[must_use]
        pub fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl ImageGen for MockImageGen {
        async fn generate(&self, request: &GenerationRequest) -> Result<ImageResponse, LlmError> {
            self.requests.lock().unwrap().push(request.clone());
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok(ImageResponse::default())
            } else {
                replies.remove(0)
            }
        }
    }

    /// A solid-color PNG of the given size.
    #[must_use]
    pub fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([rgb[0], rgb[1], rgb[2], 255]));
        let mut buf = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png).unwrap();
        buf
    }

    #[must_use]
    pub fn test_config() -> AppConfig {
        AppConfig {
            session: SessionShape { width: 64, height: 48, history_capacity: None },
            ..AppConfig::default()
        }
    }

    #[must_use]
    pub fn test_models() -> ModelCatalog {
        ModelCatalog::new("model-a", vec!["model-a".into(), "model-b".into()])
    }

    /// Test `AppState` backed by a mock generator.
    #[must_use]
    pub fn test_app_state_with(image_gen: Arc<MockImageGen>) -> AppState {
        AppState::new(&test_config(), image_gen, test_models(), ThemeStore::in_memory())
    }

    #[must_use]
    pub fn test_app_state() -> AppState {
        test_app_state_with(Arc::new(MockImageGen::new(Vec::new())))
    }

    /// Create a session in the state and return its id.
    pub async fn seed_session(state: &AppState) -> Uuid {
        state.sessions.create(state.session_shape).await.unwrap()
    }
}
