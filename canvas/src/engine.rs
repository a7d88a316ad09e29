//! Canvas controller: strokes, snapshot history, and the generation lifecycle.
//!
//! [`EngineCore`] is the single owner of a session's state. Pointer events,
//! tool changes, and generation results all arrive as `&mut self` calls and
//! come back as an [`Action`] telling the caller what to redraw or report.

use serde::Serialize;

use crate::consts::{SURFACE_HEIGHT, SURFACE_WIDTH};
use crate::generation::{GenerationError, GenerationOutcome, GenerationPhase, GenerationRequest, Submission};
use crate::history::{History, Snapshot};
use crate::input::{InputState, PenSettings, PointerEvent, PointerKind, PointerSource};
use crate::surface::{Color, DrawingSurface, SurfaceError};
use crate::viewport::{Point, Viewport};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    None,
    /// The surface changed but history did not.
    RenderNeeded,
    /// A snapshot was committed or the cursor moved; the surface changed.
    Committed { cursor: usize, len: usize },
    /// A generated image replaced the surface and was committed.
    GenerationSucceeded { cursor: usize, len: usize, message: Option<String> },
    /// The generation call failed; the surface is untouched.
    GenerationFailed { message: String },
}

/// Canvas history and generation controller.
///
/// Owns the one drawing surface of a session, its snapshot history, the
/// in-progress stroke, and the generation phase. Every mutation goes through
/// `&mut self`, so restores, strokes, and phase changes never interleave.
#[derive(Debug)]
pub struct EngineCore {
    surface: DrawingSurface,
    history: History,
    input: InputState,
    pen: PenSettings,
    viewport: Viewport,
    phase: GenerationPhase,
    settled: Option<GenerationPhase>,
    last_error: Option<String>,
    last_message: Option<String>,
    /// Set once a stroke lands or a generated image is installed; never reset.
    touched: bool,
}

impl EngineCore {
    /// Engine with a blank surface of the default size.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial snapshot cannot be encoded.
    pub fn new() -> Result<Self, SurfaceError> {
        Self::with_size(SURFACE_WIDTH, SURFACE_HEIGHT)
    }

    /// Engine with a blank surface of `width` x `height` pixels.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero dimension or if the initial snapshot cannot
    /// be encoded.
    pub fn with_size(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let surface = DrawingSurface::new(width, height)?;
        let initial = Snapshot::from_png(surface.encode_png()?);
        Ok(Self::from_parts(surface, History::new(initial)))
    }

    /// Like [`EngineCore::with_size`], keeping at most `capacity` snapshots.
    ///
    /// # Errors
    ///
    /// Same as [`EngineCore::with_size`].
    pub fn with_history_capacity(width: u32, height: u32, capacity: usize) -> Result<Self, SurfaceError> {
        let surface = DrawingSurface::new(width, height)?;
        let initial = Snapshot::from_png(surface.encode_png()?);
        Ok(Self::from_parts(surface, History::with_capacity(initial, capacity)))
    }

    fn from_parts(surface: DrawingSurface, history: History) -> Self {
        Self {
            surface,
            history,
            input: InputState::Idle,
            pen: PenSettings::default(),
            viewport: Viewport::default(),
            phase: GenerationPhase::Idle,
            settled: None,
            last_error: None,
            last_message: None,
            touched: false,
        }
    }

    // --- Tools ---

    /// Set the pen color from a CSS hex string.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidColor`] and keeps the old color.
    pub fn set_pen_color(&mut self, raw: &str) -> Result<(), SurfaceError> {
        self.pen.color = Color::parse(raw)?;
        Ok(())
    }

    /// Set the line width (clamped to the supported range).
    pub fn set_line_width(&mut self, width: f64) {
        self.pen.set_width(width);
    }

    /// Record the size the host currently displays the surface at.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    // --- Input events ---

    /// Dispatch a pointer event to the matching handler.
    ///
    /// # Errors
    ///
    /// Returns an error if ending a gesture fails to encode its snapshot.
    pub fn on_pointer(&mut self, event: PointerEvent) -> Result<Action, SurfaceError> {
        match event.kind {
            PointerKind::Down => Ok(self.on_pointer_down(event)),
            PointerKind::Move => Ok(self.on_pointer_move(event)),
            PointerKind::Up | PointerKind::Leave => self.on_pointer_up(),
        }
    }

    /// Start a stroke at the event position and stamp its round cap.
    pub fn on_pointer_down(&mut self, event: PointerEvent) -> Action {
        let Some(at) = self.to_surface(event) else {
            return Action::None;
        };
        self.surface.dot(at, self.pen.color, self.pen.width);
        self.touched = true;
        self.input = InputState::Drawing { last: at };
        Action::RenderNeeded
    }

    /// Extend the active stroke to the event position.
    pub fn on_pointer_move(&mut self, event: PointerEvent) -> Action {
        let InputState::Drawing { last } = self.input else {
            return Action::None;
        };
        let Some(at) = self.to_surface(event) else {
            return Action::None;
        };
        self.surface
            .stroke_segment(last, at, self.pen.color, self.pen.width);
        self.input = InputState::Drawing { last: at };
        Action::RenderNeeded
    }

    /// End the active stroke and commit a snapshot. Redundant end events
    /// (no stroke active) do nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded.
    pub fn on_pointer_up(&mut self) -> Result<Action, SurfaceError> {
        if !self.input.is_drawing() {
            return Ok(Action::None);
        }
        self.input = InputState::Idle;
        self.commit()
    }

    /// Whether the host should suppress default scrolling for this source.
    #[must_use]
    pub fn suppresses_scroll(&self, source: PointerSource) -> bool {
        source == PointerSource::Touch && self.input.is_drawing()
    }

    fn to_surface(&self, event: PointerEvent) -> Option<Point> {
        let display = event.point();
        if !display.is_finite() {
            return None;
        }
        Some(
            self.viewport
                .display_to_surface(display, self.surface.width(), self.surface.height()),
        )
    }

    // --- History ---

    /// Encode the surface and append it to history after the cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be encoded; history is unchanged.
    pub fn commit(&mut self) -> Result<Action, SurfaceError> {
        let snapshot = Snapshot::from_png(self.surface.encode_png()?);
        self.history.commit(snapshot);
        Ok(self.committed())
    }

    /// Step back one snapshot and redraw from it. No-op at the initial state.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be decoded; the cursor and the
    /// surface are left as they were.
    pub fn undo(&mut self) -> Result<Action, SurfaceError> {
        self.input = InputState::Idle;
        let Some(snapshot) = self.history.undo().cloned() else {
            return Ok(Action::None);
        };
        if let Err(e) = self.surface.restore_png(snapshot.png()) {
            self.history.redo();
            return Err(e);
        }
        Ok(self.committed())
    }

    /// Step forward one snapshot and redraw from it. No-op at the newest.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be decoded; the cursor and the
    /// surface are left as they were.
    pub fn redo(&mut self) -> Result<Action, SurfaceError> {
        self.input = InputState::Idle;
        let Some(snapshot) = self.history.redo().cloned() else {
            return Ok(Action::None);
        };
        if let Err(e) = self.surface.restore_png(snapshot.png()) {
            self.history.undo();
            return Err(e);
        }
        Ok(self.committed())
    }

    /// Fill the surface with the background color and commit.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded.
    pub fn clear(&mut self) -> Result<Action, SurfaceError> {
        self.input = InputState::Idle;
        self.surface.clear();
        self.commit()
    }

    fn committed(&self) -> Action {
        Action::Committed { cursor: self.history.cursor(), len: self.history.len() }
    }

    // --- Generation ---

    /// Move `Idle → Submitting` and build the request.
    ///
    /// The surface is flattened onto opaque white and PNG-encoded. A blank
    /// surface sends no drawing, only text.
    ///
    /// # Errors
    ///
    /// - [`GenerationError::Busy`] while another request is in flight.
    /// - [`GenerationError::EmptyPrompt`] for a blank prompt.
    /// - [`GenerationError::Surface`] if encoding fails; the phase returns to
    ///   idle.
    pub fn begin_generation(&mut self, submission: Submission) -> Result<GenerationRequest, GenerationError> {
        if self.is_busy() {
            return Err(GenerationError::Busy);
        }
        if submission.prompt.trim().is_empty() {
            return Err(GenerationError::EmptyPrompt);
        }
        self.phase = GenerationPhase::Submitting;
        self.last_error = None;
        self.last_message = None;

        let drawing = if !self.touched {
            None
        } else {
            match self.surface.flatten_opaque().encode_png() {
                Ok(png) => Some(png),
                Err(e) => {
                    self.phase = GenerationPhase::Idle;
                    return Err(e.into());
                }
            }
        };

        Ok(GenerationRequest {
            prompt: submission.prompt,
            drawing,
            similarity: submission.similarity,
            model: submission.model,
            credential: submission.credential.filter(|c| !c.trim().is_empty()),
        })
    }

    /// Settle the in-flight request and return to `Idle`.
    ///
    /// `Ok` with image bytes installs the image as the new surface content and
    /// commits it. `Ok` without an image, an undecodable image, and `Err` all
    /// fail: the message is recorded and the surface is left untouched. Never
    /// returns an error; every failure becomes [`Action::GenerationFailed`].
    pub fn finish_generation(&mut self, result: Result<GenerationOutcome, String>) -> Action {
        if !self.is_busy() {
            return Action::None;
        }
        let action = match result {
            Ok(outcome) => self.apply_outcome(outcome),
            Err(message) => self.fail(message),
        };
        self.phase = GenerationPhase::Idle;
        action
    }

    fn apply_outcome(&mut self, outcome: GenerationOutcome) -> Action {
        let message = outcome.text.filter(|t| !t.trim().is_empty());
        let Some(image) = outcome.image else {
            let reason = match message {
                Some(text) => format!("{}: {text}", GenerationError::NoImage),
                None => GenerationError::NoImage.to_string(),
            };
            return self.fail(reason);
        };

        let before = self.surface.clone();
        if let Err(e) = self.surface.install_background(&image) {
            return self.fail(e.to_string());
        }
        if let Err(e) = self.commit() {
            self.surface = before;
            return self.fail(e.to_string());
        }

        self.touched = true;
        self.settled = Some(GenerationPhase::Succeeded);
        self.last_message.clone_from(&message);
        Action::GenerationSucceeded { cursor: self.history.cursor(), len: self.history.len(), message }
    }

    fn fail(&mut self, message: String) -> Action {
        self.settled = Some(GenerationPhase::Failed);
        self.last_error = Some(message.clone());
        Action::GenerationFailed { message }
    }

    /// Forget the last error, as when the user dismisses the error dialog.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    // --- Queries ---

    /// Whether a generation request is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase == GenerationPhase::Submitting
    }

    #[must_use]
    pub fn phase(&self) -> GenerationPhase {
        self.phase
    }

    /// Result of the most recently settled request, if any.
    #[must_use]
    pub fn last_outcome(&self) -> Option<GenerationPhase> {
        self.settled
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Text that accompanied the last successful image.
    #[must_use]
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    #[must_use]
    pub fn is_drawing(&self) -> bool {
        self.input.is_drawing()
    }

    #[must_use]
    pub fn pen(&self) -> PenSettings {
        self.pen
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// PNG bytes of the snapshot at the cursor.
    #[must_use]
    pub fn snapshot_png(&self) -> &[u8] {
        self.history.current().png()
    }

    /// PNG of the live surface, including any stroke still in progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be encoded.
    pub fn render_png(&self) -> Result<Vec<u8>, SurfaceError> {
        self.surface.encode_png()
    }
}
