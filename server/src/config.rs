//! Server configuration parsed from environment variables.

use std::path::PathBuf;

use canvas::consts::{SURFACE_HEIGHT, SURFACE_WIDTH};

use crate::services::session::SessionShape;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
#[error("invalid {key}: '{value}'")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Where the theme preference is stored; in memory when `None`.
    pub theme_file: Option<PathBuf>,
    /// Front-end directory served for non-API paths.
    pub static_dir: Option<PathBuf>,
    pub session: SessionShape,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            theme_file: None,
            static_dir: None,
            session: SessionShape { width: SURFACE_WIDTH, height: SURFACE_HEIGHT, history_capacity: None },
        }
    }
}

impl AppConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `THEME_FILE`: theme preference file
    /// - `STATIC_DIR`: front-end directory to serve
    /// - `SURFACE_WIDTH` / `SURFACE_HEIGHT`: default 960x540
    /// - `HISTORY_CAPACITY`: snapshots kept per session, unbounded when unset
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a value that is set but does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for a value that is set but does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = parse(get("PORT"), "PORT")?.unwrap_or(defaults.port);
        let theme_file = get("THEME_FILE").map(PathBuf::from);
        let static_dir = get("STATIC_DIR").map(PathBuf::from);
        let width = parse_nonzero(get("SURFACE_WIDTH"), "SURFACE_WIDTH")?.unwrap_or(defaults.session.width);
        let height = parse_nonzero(get("SURFACE_HEIGHT"), "SURFACE_HEIGHT")?.unwrap_or(defaults.session.height);
        let history_capacity = parse(get("HISTORY_CAPACITY"), "HISTORY_CAPACITY")?;

        Ok(Self { port, theme_file, static_dir, session: SessionShape { width, height, history_capacity } })
    }
}

fn parse<T: std::str::FromStr>(raw: Option<String>, key: &'static str) -> Result<Option<T>, ConfigError> {
    raw.map(|value| value.parse::<T>().map_err(|_| ConfigError { key, value }))
        .transpose()
}

fn parse_nonzero(raw: Option<String>, key: &'static str) -> Result<Option<u32>, ConfigError> {
    match parse::<u32>(raw, key)? {
        Some(0) => Err(ConfigError { key, value: "0".into() }),
        other => Ok(other),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
