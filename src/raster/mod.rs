//! Raster backend abstraction.
//!
//! The composer and tile renderer never touch pixels directly. Every
//! primitive they need goes through a [`RasterBackend`], so an alternative
//! rasterizer can be swapped in without changing the layout algorithm.
//! [`ImageBackend`] is the default implementation.

pub mod image_backend;

pub use image_backend::ImageBackend;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Geometry
// ============================================================================

/// A rectangle in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    /// Creates a new rectangle with the given position and dimensions.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Creates a rectangle starting at origin (0, 0) with the given dimensions.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self { x: 0, y: 0, width, height }
    }

    /// Returns the right edge coordinate (x + width), saturating at `u32::MAX`.
    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Returns the bottom edge coordinate (y + height), saturating at `u32::MAX`.
    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }
}

/// Counter-clockwise rotation by a multiple of 90 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Ccw90,
    Ccw180,
    Ccw270,
}

impl Rotation {
    /// Rotation for a number of counter-clockwise quarter turns, `None` for
    /// a multiple of four.
    pub fn from_quarter_turns(turns: u8) -> Option<Self> {
        match turns % 4 {
            1 => Some(Self::Ccw90),
            2 => Some(Self::Ccw180),
            3 => Some(Self::Ccw270),
            _ => None,
        }
    }

    /// Angle in degrees, counter-clockwise.
    pub fn degrees(self) -> u32 {
        match self {
            Self::Ccw90 => 90,
            Self::Ccw180 => 180,
            Self::Ccw270 => 270,
        }
    }
}

/// Mirror axis for [`RasterBackend::flip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipAxis {
    /// Mirror left to right.
    Horizontal,
    /// Mirror top to bottom.
    Vertical,
}

// ============================================================================
// PNG options
// ============================================================================

/// Deflate effort for PNG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PngCompression {
    #[default]
    Default,
    Fast,
    Best,
}

/// Scanline filter for PNG output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PngFilter {
    NoFilter,
    Sub,
    Up,
    Avg,
    Paeth,
    #[default]
    Adaptive,
}

/// PNG encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct PngOptions {
    #[serde(default)]
    pub compression: PngCompression,
    #[serde(default)]
    pub filter: PngFilter,
}

impl PngOptions {
    /// Smallest output, slowest encode.
    pub fn best_compression() -> Self {
        Self {
            compression: PngCompression::Best,
            filter: PngFilter::Paeth,
        }
    }

    /// Fastest encode, larger output.
    pub fn fast() -> Self {
        Self {
            compression: PngCompression::Fast,
            filter: PngFilter::NoFilter,
        }
    }
}

// ============================================================================
// RasterBackend
// ============================================================================

/// Primitive 2D drawing operations consumed by the identicon core.
///
/// Images are plain owned values; a backend holds no per-image state, so a
/// single backend value can be shared by the composer and the tile renderer.
pub trait RasterBackend {
    /// Owned raster image.
    type Image: Clone;

    /// Color handle accepted by the fill primitives.
    type Color: Copy;

    /// Whether [`fill_polygon`](Self::fill_polygon) can antialias edges.
    fn supports_antialias(&self) -> bool;

    /// Creates a `width x height` canvas filled with `background`.
    fn create_canvas(&self, width: u32, height: u32, background: Self::Color) -> Result<Self::Image>;

    /// Allocates a color handle.
    fn allocate_color(&self, red: u8, green: u8, blue: u8) -> Self::Color;

    /// Returns `(width, height)` of an image.
    fn dimensions(&self, image: &Self::Image) -> (u32, u32);

    /// Fills a rectangle, clipped to the image.
    fn fill_rect(&self, image: &mut Self::Image, rect: RectPx, color: Self::Color);

    /// Fills a closed polygon with the even-odd rule.
    ///
    /// Coordinates are pixel edges: pixel `(x, y)` spans `[x, x + 1)`, so
    /// `(0, 0)..(width, height)` covers every pixel of the image.
    fn fill_polygon(
        &self,
        image: &mut Self::Image,
        points: &[(f32, f32)],
        color: Self::Color,
        antialias: bool,
    ) -> Result<()>;

    /// Copies all of `src` into `dst` with its top-left corner at `(x, y)`.
    fn copy_region(&self, src: &Self::Image, dst: &mut Self::Image, x: u32, y: u32);

    /// Returns `image` rotated counter-clockwise. Corners exposed by the
    /// rotation are painted with `fill`.
    fn rotate(&self, image: &Self::Image, rotation: Rotation, fill: Self::Color) -> Self::Image;

    /// Mirrors an image in place.
    fn flip(&self, image: &mut Self::Image, axis: FlipAxis);

    /// Returns a smoothly resampled copy of `image` at the given size.
    fn resample(&self, image: &Self::Image, width: u32, height: u32) -> Self::Image;

    /// Encodes `image` as PNG into `writer`.
    fn encode_png(&self, image: &Self::Image, writer: &mut dyn Write, options: PngOptions) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_px_edges() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
        assert_eq!(RectPx::from_size(4, 5), RectPx::new(0, 0, 4, 5));

        let huge = RectPx::new(u32::MAX - 1, 3, u32::MAX, u32::MAX);
        assert_eq!(huge.right(), u32::MAX);
        assert_eq!(huge.bottom(), u32::MAX);
    }

    #[test]
    fn rotation_from_quarter_turns() {
        assert_eq!(Rotation::from_quarter_turns(0), None);
        assert_eq!(Rotation::from_quarter_turns(1), Some(Rotation::Ccw90));
        assert_eq!(Rotation::from_quarter_turns(3).map(Rotation::degrees), Some(270));
        assert_eq!(Rotation::from_quarter_turns(6), Some(Rotation::Ccw180));
    }

    #[test]
    fn png_options_json() {
        let json = serde_json::to_string(&PngOptions::best_compression()).unwrap();
        assert_eq!(json, r#"{"compression":"best","filter":"paeth"}"#);
        let restored: PngOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(restored, PngOptions::default());
    }
}
