//! UI theme preference: one key read at startup, written on every change.
//!
//! The value lives in a small JSON file (`{"theme": "dark"}`). A missing or
//! unreadable file, or an unknown value, falls back to [`Theme::Light`].
//! With no file configured the preference is kept in memory only.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Sepia,
}

impl Theme {
    pub const ALL: [Self; 3] = [Self::Light, Self::Dark, Self::Sepia];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Sepia => "sepia",
        }
    }

    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "sepia" => Some(Self::Sepia),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ThemeError {
    #[error("unknown theme: {0}")]
    Unknown(String),
    #[error("theme write failed: {0}")]
    Write(String),
}

impl crate::error::ErrorCode for ThemeError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unknown(_) => "E_UNKNOWN_THEME",
            Self::Write(_) => "E_THEME_WRITE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}

#[derive(Serialize, Deserialize)]
struct ThemeFile {
    theme: String,
}

// =============================================================================
// STORE
// =============================================================================

pub struct ThemeStore {
    path: Option<PathBuf>,
    current: RwLock<Theme>,
}

impl ThemeStore {
    /// In-memory store starting at the default theme.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { path: None, current: RwLock::new(Theme::default()) }
    }

    /// Read the stored theme from `path`, falling back to the default.
    pub async fn load(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::in_memory();
        };
        let theme = read_theme(&path).await;
        Self { path: Some(path), current: RwLock::new(theme) }
    }

    pub async fn get(&self) -> Theme {
        *self.current.read().await
    }

    /// Persist `theme`, then make it current.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Write`] if the file cannot be written; the
    /// current theme is unchanged.
    pub async fn set(&self, theme: Theme) -> Result<Theme, ThemeError> {
        let mut current = self.current.write().await;
        if let Some(path) = &self.path {
            let body = serde_json::to_vec(&ThemeFile { theme: theme.as_str().to_owned() })
                .map_err(|e| ThemeError::Write(e.to_string()))?;
            tokio::fs::write(path, body)
                .await
                .map_err(|e| ThemeError::Write(e.to_string()))?;
        }
        *current = theme;
        info!(theme = theme.as_str(), "theme changed");
        Ok(theme)
    }

    /// Parse and persist a raw theme name.
    ///
    /// # Errors
    ///
    /// Returns [`ThemeError::Unknown`] for a name outside [`Theme::ALL`], or
    /// [`ThemeError::Write`] as in [`ThemeStore::set`].
    pub async fn set_named(&self, raw: &str) -> Result<Theme, ThemeError> {
        let theme = Theme::from_str(raw).ok_or_else(|| ThemeError::Unknown(raw.to_owned()))?;
        self.set(theme).await
    }
}

async fn read_theme(path: &Path) -> Theme {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Theme::default(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "theme file unreadable; using default");
            return Theme::default();
        }
    };
    match serde_json::from_slice::<ThemeFile>(&raw) {
        Ok(file) => Theme::from_str(&file.theme).unwrap_or_else(|| {
            warn!(value = %file.theme, "unknown stored theme; using default");
            Theme::default()
        }),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "theme file malformed; using default");
            Theme::default()
        }
    }
}

#[cfg(test)]
#[path = "theme_test.rs"]
mod tests;
