//! Input model: pointer events, pen settings, and the stroke state machine.
//!
//! `PointerEvent` is what the host forwards from mouse and touch handlers, in
//! display pixels. `InputState` is the gesture being tracked between
//! pointer-down and pointer-up. It remembers only the last visited point, since
//! strokes are rendered straight onto the surface as they happen.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_LINE_WIDTH, MAX_LINE_WIDTH, MIN_LINE_WIDTH};
use crate::surface::Color;
use crate::viewport::Point;

/// Device that produced a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSource {
    /// Mouse, pen, or trackpad.
    #[default]
    Mouse,
    /// Finger on a touch screen. Default scrolling is suppressed mid-gesture.
    Touch,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// Pointer left the surface; ends the gesture like `Up`.
    Leave,
}

/// A single pointer event in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub source: PointerSource,
}

impl PointerEvent {
    #[must_use]
    pub fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y, source: PointerSource::Mouse }
    }

    #[must_use]
    pub fn touch(kind: PointerKind, x: f64, y: f64) -> Self {
        Self { kind, x, y, source: PointerSource::Touch }
    }

    #[must_use]
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Current pen color and line width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenSettings {
    pub color: Color,
    pub width: f64,
}

impl Default for PenSettings {
    fn default() -> Self {
        Self { color: Color::BLACK, width: DEFAULT_LINE_WIDTH }
    }
}

impl PenSettings {
    /// Set the line width, clamped to the supported range. Non-finite values
    /// are ignored.
    pub fn set_width(&mut self, width: f64) {
        if width.is_finite() {
            self.width = width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH);
        }
    }
}

/// Gesture state tracked between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A stroke is in progress.
    Drawing {
        /// Surface-space position of the previous pointer event.
        last: Point,
    },
}

impl InputState {
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
