//! Raster drawing surface: the pixels the user draws on.
//!
//! `DrawingSurface` is a fixed-size RGBA bitmap mutated in place. Strokes are
//! immediate-mode: each pointer move stamps a round-capped segment straight
//! into the pixels, and nothing about an individual stroke is remembered. The
//! only way to go back is to restore a whole-surface PNG (see
//! [`crate::history`]).
//!
//! Every decode happens before the first pixel is touched, so a bad payload
//! leaves the surface exactly as it was.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::fmt;
use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::consts::BACKGROUND_HEX;
use crate::viewport::Point;

/// Errors produced while encoding, decoding, or configuring the surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The surface could not be encoded as PNG.
    #[error("surface encode failed: {0}")]
    Encode(String),

    /// A snapshot or returned image could not be decoded.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// A color string was not `#rgb` or `#rrggbb`.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Requested surface dimensions were zero.
    #[error("invalid surface size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
}

// =============================================================================
// COLOR
// =============================================================================

/// An opaque RGB color. Serialized as a `#rrggbb` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self { r: 0xFF, g: 0xFF, b: 0xFF };
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a CSS hex color (`#rgb` or `#rrggbb`, case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidColor`] for anything else.
    pub fn parse(raw: &str) -> Result<Self, SurfaceError> {
        let invalid = || SurfaceError::InvalidColor(raw.to_owned());
        let hex = raw.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        match hex.len() {
            3 => {
                let expand = |i: usize| channel(&hex[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
            _ => Err(invalid()),
        }
    }

    /// Lowercase `#rrggbb` form.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0xFF])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = SurfaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// =============================================================================
// SURFACE
// =============================================================================

/// A fixed-size raster bitmap with an opaque background color.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSurface {
    pixels: RgbaImage,
    background: Color,
}

impl DrawingSurface {
    /// Create a surface filled with the default white background.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidSize`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        let background = Color::parse(BACKGROUND_HEX)?;
        Self::with_background(width, height, background)
    }

    /// Create a surface filled with `background`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::InvalidSize`] if either dimension is zero.
    pub fn with_background(width: u32, height: u32, background: Color) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidSize { width, height });
        }
        Ok(Self { pixels: RgbaImage::from_pixel(width, height, background.rgba()), background })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[must_use]
    pub fn background(&self) -> Color {
        self.background
    }

    /// Color of the pixel at `(x, y)`, or `None` outside the surface.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| Color::new(p[0], p[1], p[2]))
    }

    /// Whether every pixel is the background color.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        let bg = self.background.rgba();
        self.pixels.pixels().all(|p| *p == bg)
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        let rgba = color.rgba();
        for p in self.pixels.pixels_mut() {
            *p = rgba;
        }
    }

    /// Overwrite every pixel with the background color.
    pub fn clear(&mut self) {
        self.fill(self.background);
    }

    // --- Strokes ---

    /// Stamp a round dot of diameter `width` centered on `at`.
    pub fn dot(&mut self, at: Point, color: Color, width: f64) {
        self.stamp_disc(at, disc_radius(width), color.rgba());
    }

    /// Render a round-capped, round-joined segment from `from` to `to`.
    ///
    /// Discs are stamped at most half a radius apart, which leaves no gaps in
    /// the swept area. Consecutive segments share their endpoint disc, which
    /// gives the round join.
    pub fn stroke_segment(&mut self, from: Point, to: Point, color: Color, width: f64) {
        let radius = disc_radius(width);
        let rgba = color.rgba();
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let length = dx.hypot(dy);
        let spacing = (radius / 2.0).max(0.5);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let steps = (length / spacing).ceil().max(1.0) as u32;
        for i in 0..=steps {
            let t = f64::from(i) / f64::from(steps);
            self.stamp_disc(Point::new(from.x + dx * t, from.y + dy * t), radius, rgba);
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn stamp_disc(&mut self, center: Point, radius: f64, rgba: Rgba<u8>) {
        let max_x = f64::from(self.pixels.width() - 1);
        let max_y = f64::from(self.pixels.height() - 1);
        let x0 = (center.x - radius).floor().max(0.0);
        let x1 = (center.x + radius).ceil().min(max_x);
        let y0 = (center.y - radius).floor().max(0.0);
        let y1 = (center.y + radius).ceil().min(max_y);
        if !(x0 <= x1 && y0 <= y1) {
            return;
        }
        let r2 = radius * radius;
        for y in (y0 as u32)..=(y1 as u32) {
            let py = f64::from(y) + 0.5 - center.y;
            for x in (x0 as u32)..=(x1 as u32) {
                let px = f64::from(x) + 0.5 - center.x;
                if px * px + py * py <= r2 {
                    self.pixels.put_pixel(x, y, rgba);
                }
            }
        }
    }

    // --- Encoding ---

    /// Encode the surface as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Encode`] if the encoder fails.
    pub fn encode_png(&self) -> Result<Vec<u8>, SurfaceError> {
        let mut buf = Vec::new();
        self.pixels
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .map_err(|e| SurfaceError::Encode(e.to_string()))?;
        Ok(buf)
    }

    /// Replace the surface contents with a PNG snapshot.
    ///
    /// The snapshot is decoded first; then the surface is cleared and fully
    /// overdrawn. Snapshots of a different size are scaled to fit exactly.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Decode`] without touching the surface if the
    /// bytes are not a decodable PNG.
    pub fn restore_png(&mut self, png: &[u8]) -> Result<(), SurfaceError> {
        let mut decoded = decode_png(png)?;
        if decoded.dimensions() != self.pixels.dimensions() {
            decoded = imageops::resize(&decoded, self.width(), self.height(), FilterType::Triangle);
        }
        self.clear();
        imageops::overlay(&mut self.pixels, &decoded, 0, 0);
        Ok(())
    }

    /// Install a generated image as the new surface content.
    ///
    /// The image is composited, aspect-preserving and centered, over a fresh
    /// opaque background fill. Later strokes land on top of it.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Decode`] without touching the surface if the
    /// bytes are not a decodable image.
    pub fn install_background(&mut self, bytes: &[u8]) -> Result<(), SurfaceError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| SurfaceError::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = fit_within(decoded.dimensions(), self.pixels.dimensions());
        let scaled = if (width, height) == decoded.dimensions() {
            decoded
        } else {
            imageops::resize(&decoded, width, height, FilterType::Triangle)
        };
        let x = i64::from((self.width() - width) / 2);
        let y = i64::from((self.height() - height) / 2);
        self.clear();
        imageops::overlay(&mut self.pixels, &scaled, x, y);
        Ok(())
    }

    /// Composite this surface onto an opaque white surface of the same size.
    ///
    /// The result never carries transparency, whatever this surface holds.
    #[must_use]
    pub fn flatten_opaque(&self) -> Self {
        let mut flat = RgbaImage::from_pixel(self.width(), self.height(), Color::WHITE.rgba());
        imageops::overlay(&mut flat, &self.pixels, 0, 0);
        Self { pixels: flat, background: self.background }
    }
}

fn decode_png(bytes: &[u8]) -> Result<RgbaImage, SurfaceError> {
    image::load_from_memory_with_format(bytes, ImageFormat::Png)
        .map(|img| img.to_rgba8())
        .map_err(|e| SurfaceError::Decode(e.to_string()))
}

/// Radius of the stamped disc for a given line width. Never thinner than a
/// pixel so hairlines stay visible.
fn disc_radius(width: f64) -> f64 {
    (width / 2.0).max(0.75)
}

/// Largest `(w, h)` with the source aspect ratio that fits inside `bounds`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (sw, sh) = (f64::from(source.0.max(1)), f64::from(source.1.max(1)));
    let (bw, bh) = (f64::from(bounds.0), f64::from(bounds.1));
    let scale = (bw / sw).min(bh / sh);
    let w = (sw * scale).round().clamp(1.0, bw) as u32;
    let h = (sh * scale).round().clamp(1.0, bh) as u32;
    (w, h)
}
