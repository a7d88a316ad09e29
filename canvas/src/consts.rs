//! Shared constants for the canvas crate.

// ── Surface ─────────────────────────────────────────────────────

/// Intrinsic width of the drawing surface in pixels.
pub const SURFACE_WIDTH: u32 = 960;

/// Intrinsic height of the drawing surface in pixels.
pub const SURFACE_HEIGHT: u32 = 540;

/// Opaque fill used for blank surfaces and under generated images.
pub const BACKGROUND_HEX: &str = "#FFFFFF";

// ── Pen ─────────────────────────────────────────────────────────

/// Line width for a fresh session, in surface pixels.
pub const DEFAULT_LINE_WIDTH: f64 = 5.0;

/// Thinnest line the pen will draw.
pub const MIN_LINE_WIDTH: f64 = 1.0;

/// Thickest line the pen will draw.
pub const MAX_LINE_WIDTH: f64 = 50.0;

// ── Generation ──────────────────────────────────────────────────

/// Similarity level for a fresh session (middle of the dial).
pub const DEFAULT_SIMILARITY: f64 = 0.5;

/// Directive appended to every prompt so the model keeps the sketch style.
pub const STYLE_DIRECTIVE: &str = "Keep the same minimal line drawing style.";
