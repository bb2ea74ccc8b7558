//! Default raster backend built on `image` and `tiny-skia`.
//!
//! Canvases are [`RgbaImage`]s. Polygons are rasterized by tiny-skia into a
//! scratch pixmap and composited onto the canvas, which gives antialiased
//! edges; every other primitive maps onto `image::imageops`.

use std::io::Write;

use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, Rgba, RgbaImage};
use palette::Srgb;
use resvg::tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use super::{FlipAxis, PngCompression, PngFilter, PngOptions, RasterBackend, RectPx, Rotation};
use crate::error::{IdenticonError, Result};

// ============================================================================
// ImageBackend
// ============================================================================

/// Raster backend producing [`RgbaImage`] canvases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageBackend {
    antialias: bool,
}

impl Default for ImageBackend {
    fn default() -> Self {
        Self { antialias: true }
    }
}

impl ImageBackend {
    /// Creates a backend with antialiased polygon fill.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend that fills polygons with hard edges only.
    ///
    /// Composers built on it oversample instead when high quality is requested.
    pub fn without_antialias() -> Self {
        Self { antialias: false }
    }
}

fn to_rgba(color: Srgb<u8>) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, 255])
}

impl RasterBackend for ImageBackend {
    type Image = RgbaImage;
    type Color = Srgb<u8>;

    fn supports_antialias(&self) -> bool {
        self.antialias
    }

    fn create_canvas(&self, width: u32, height: u32, background: Srgb<u8>) -> Result<RgbaImage> {
        if width == 0 || height == 0 {
            return Err(IdenticonError::Raster(format!(
                "cannot create a {width}x{height} canvas"
            )));
        }
        Ok(RgbaImage::from_pixel(width, height, to_rgba(background)))
    }

    fn allocate_color(&self, red: u8, green: u8, blue: u8) -> Srgb<u8> {
        Srgb::new(red, green, blue)
    }

    fn dimensions(&self, image: &RgbaImage) -> (u32, u32) {
        image.dimensions()
    }

    fn fill_rect(&self, image: &mut RgbaImage, rect: RectPx, color: Srgb<u8>) {
        let pixel = to_rgba(color);
        let right = rect.right().min(image.width());
        let bottom = rect.bottom().min(image.height());
        for y in rect.y..bottom {
            for x in rect.x..right {
                image.put_pixel(x, y, pixel);
            }
        }
    }

    fn fill_polygon(
        &self,
        image: &mut RgbaImage,
        points: &[(f32, f32)],
        color: Srgb<u8>,
        antialias: bool,
    ) -> Result<()> {
        let Some((&(first_x, first_y), rest)) = points.split_first() else {
            return Ok(());
        };

        let mut builder = PathBuilder::new();
        builder.move_to(first_x, first_y);
        for &(x, y) in rest {
            builder.line_to(x, y);
        }
        builder.close();
        let Some(path) = builder.finish() else {
            // Degenerate outline with no area.
            return Ok(());
        };

        let mut pixmap = Pixmap::new(image.width(), image.height()).ok_or_else(|| {
            IdenticonError::Raster(format!(
                "cannot allocate {}x{} pixmap",
                image.width(),
                image.height()
            ))
        })?;

        let mut paint = Paint::default();
        paint.set_color_rgba8(color.red, color.green, color.blue, 255);
        paint.anti_alias = antialias && self.antialias;
        pixmap.fill_path(&path, &paint, FillRule::EvenOdd, Transform::identity(), None);

        blend_coverage(image, &pixmap, color);
        Ok(())
    }

    fn copy_region(&self, src: &RgbaImage, dst: &mut RgbaImage, x: u32, y: u32) {
        imageops::replace(dst, src, i64::from(x), i64::from(y));
    }

    fn rotate(&self, image: &RgbaImage, rotation: Rotation, _fill: Srgb<u8>) -> RgbaImage {
        // Quarter turns expose no corners, so the fill color is never needed.
        match rotation {
            Rotation::Ccw90 => imageops::rotate270(image),
            Rotation::Ccw180 => imageops::rotate180(image),
            Rotation::Ccw270 => imageops::rotate90(image),
        }
    }

    fn flip(&self, image: &mut RgbaImage, axis: FlipAxis) {
        match axis {
            FlipAxis::Horizontal => imageops::flip_horizontal_in_place(image),
            FlipAxis::Vertical => imageops::flip_vertical_in_place(image),
        }
    }

    fn resample(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        if image.dimensions() == (width, height) {
            return image.clone();
        }
        imageops::resize(image, width, height, FilterType::Triangle)
    }

    fn encode_png(&self, image: &RgbaImage, writer: &mut dyn Write, options: PngOptions) -> Result<()> {
        let encoder = PngEncoder::new_with_quality(
            writer,
            compression_type(options.compression),
            filter_type(options.filter),
        );
        encoder.write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}

fn compression_type(compression: PngCompression) -> CompressionType {
    match compression {
        PngCompression::Default => CompressionType::Default,
        PngCompression::Fast => CompressionType::Fast,
        PngCompression::Best => CompressionType::Best,
    }
}

fn filter_type(filter: PngFilter) -> PngFilterType {
    match filter {
        PngFilter::NoFilter => PngFilterType::NoFilter,
        PngFilter::Sub => PngFilterType::Sub,
        PngFilter::Up => PngFilterType::Up,
        PngFilter::Avg => PngFilterType::Avg,
        PngFilter::Paeth => PngFilterType::Paeth,
        PngFilter::Adaptive => PngFilterType::Adaptive,
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Blends `color` into `dest` weighted by the coverage tiny-skia rendered.
///
/// The paint is opaque, so the pixmap alpha is exactly the polygon coverage
/// of each pixel and the color channels can be ignored.
fn blend_coverage(dest: &mut RgbaImage, coverage: &Pixmap, color: Srgb<u8>) {
    let source = [color.red, color.green, color.blue];
    for (x, y, pixel) in dest.enumerate_pixels_mut() {
        let alpha = match coverage.pixel(x, y) {
            Some(p) if p.alpha() > 0 => u32::from(p.alpha()),
            _ => continue,
        };
        let keep = 255 - alpha;
        let [r, g, b, a] = pixel.0;
        let mix = |src: u8, dst: u8| ((u32::from(src) * alpha + u32::from(dst) * keep + 127) / 255) as u8;
        *pixel = Rgba([
            mix(source[0], r),
            mix(source[1], g),
            mix(source[2], b),
            (alpha + (u32::from(a) * keep + 127) / 255) as u8,
        ]);
    }
}

// ============================================================================
// Tests
// ============================================================================
