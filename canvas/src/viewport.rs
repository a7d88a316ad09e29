//! Display-to-surface coordinate mapping.
//!
//! The surface has a fixed intrinsic size, but the host may show it scaled to
//! fit a responsive layout. Pointer coordinates arrive in displayed pixels and
//! are mapped back by the ratio of intrinsic size to displayed size.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

/// Extra room around the surface that mapped points are clamped into. Keeps
/// strokes that leave the surface bounded without clipping their visible part.
const CLAMP_MARGIN_PX: f64 = 256.0;

/// A point in either display or surface space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both coordinates are finite numbers.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Size at which the host currently displays the surface, in CSS pixels.
///
/// `None` means the surface is shown at its intrinsic size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub display_width: Option<f64>,
    pub display_height: Option<f64>,
}

impl Viewport {
    /// Viewport for a surface displayed at `width` x `height` CSS pixels.
    #[must_use]
    pub fn scaled(width: f64, height: f64) -> Self {
        Self { display_width: Some(width), display_height: Some(height) }
    }

    /// Convert a display-space point to surface pixels.
    ///
    /// Non-positive or missing display sizes fall back to a 1:1 mapping on
    /// that axis. The result is clamped to a margin around the surface.
    #[must_use]
    pub fn display_to_surface(&self, display: Point, surface_width: u32, surface_height: u32) -> Point {
        let (sw, sh) = (f64::from(surface_width), f64::from(surface_height));
        let sx = ratio(sw, self.display_width);
        let sy = ratio(sh, self.display_height);
        Point {
            x: (display.x * sx).clamp(-CLAMP_MARGIN_PX, sw + CLAMP_MARGIN_PX),
            y: (display.y * sy).clamp(-CLAMP_MARGIN_PX, sh + CLAMP_MARGIN_PX),
        }
    }
}

fn ratio(intrinsic: f64, displayed: Option<f64>) -> f64 {
    match displayed {
        Some(d) if d.is_finite() && d > 0.0 => intrinsic / d,
        _ => 1.0,
    }
}
