//! Canvas sessions: one `EngineCore` per id, held in memory.
//!
//! ARCHITECTURE
//! ============
//! The store maps ids to `Arc<Mutex<EngineCore>>`. The outer map lock is only
//! held long enough to clone the handle; all canvas work happens under the
//! per-session mutex, so two sessions never contend.
//!
//! Sessions live until deleted or the process exits. Nothing is persisted.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use canvas::engine::EngineCore;
use canvas::generation::GenerationPhase;
use canvas::input::PenSettings;
use canvas::surface::SurfaceError;

pub type SessionHandle = Arc<Mutex<EngineCore>>;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

impl crate::error::ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SESSION_NOT_FOUND",
            Self::Surface(SurfaceError::InvalidColor(_)) => "E_INVALID_COLOR",
            Self::Surface(SurfaceError::InvalidSize { .. }) => "E_INVALID_SIZE",
            Self::Surface(_) => "E_SURFACE",
        }
    }
}

/// Shape of a new session's engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionShape {
    pub width: u32,
    pub height: u32,
    /// History bound; `None` keeps every snapshot.
    pub history_capacity: Option<usize>,
}

// =============================================================================
// STORE
// =============================================================================

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with a blank surface and return its id.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Surface`] if the blank surface cannot be built.
    pub async fn create(&self, shape: SessionShape) -> Result<Uuid, SessionError> {
        let engine = match shape.history_capacity {
            Some(capacity) => EngineCore::with_history_capacity(shape.width, shape.height, capacity)?,
            None => EngineCore::with_size(shape.width, shape.height)?,
        };
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(engine)));
        Ok(id)
    }

    /// Handle to a live session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    /// Drop a session. In-flight work on a cloned handle finishes unobserved.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotFound`] for an unknown id.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    /// Number of live sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

// =============================================================================
// VIEW
// =============================================================================

/// Everything a front end needs to render controls for a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub id: Uuid,
    pub width: u32,
    pub height: u32,
    pub cursor: usize,
    pub len: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub drawing: bool,
    pub busy: bool,
    pub phase: GenerationPhase,
    pub last_outcome: Option<GenerationPhase>,
    pub pen: PenSettings,
    pub last_error: Option<String>,
    pub last_message: Option<String>,
}

impl SessionView {
    #[must_use]
    pub fn of(id: Uuid, engine: &EngineCore) -> Self {
        let history = engine.history();
        Self {
            id,
            width: engine.surface().width(),
            height: engine.surface().height(),
            cursor: history.cursor(),
            len: history.len(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
            drawing: engine.is_drawing(),
            busy: engine.is_busy(),
            phase: engine.phase(),
            last_outcome: engine.last_outcome(),
            pen: engine.pen(),
            last_error: engine.last_error().map(str::to_owned),
            last_message: engine.last_message().map(str::to_owned),
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
