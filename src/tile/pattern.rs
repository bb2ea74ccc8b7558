//! Catalog-driven tile renderer.

use palette::Srgb;
use tracing::{debug, trace};

use super::Tile;
use super::catalog::{PatternCatalog, TileTransform};
use crate::color::mix_contrast;
use crate::error::{IdenticonError, Result};
use crate::raster::{FlipAxis, RasterBackend, RectPx, Rotation};

/// Smallest tile on which the half-unit vertices land on a whole pixel.
const MINIMUM_TILE_SIZE: u32 = 3;

/// Working canvas of an allocated tile.
struct Canvas<B: RasterBackend> {
    size: u32,
    image: B::Image,
    background: B::Color,
}

/// Tile renderer that draws polygons from a [`PatternCatalog`].
///
/// # Example
///
/// ```
/// use identicon_renderer::{ImageBackend, PatternTile, Tile};
///
/// let mut tile = PatternTile::new(ImageBackend::new());
/// tile.allocate(12).unwrap();
/// let red = tile.color(255, 0, 0).unwrap();
/// let image = tile.draw(22, red).unwrap();
/// assert_eq!(image.dimensions(), (12, 12));
/// ```
pub struct PatternTile<B: RasterBackend> {
    backend: B,
    catalog: PatternCatalog,
    background: Srgb<u8>,
    canvas: Option<Canvas<B>>,
}

impl<B: RasterBackend> PatternTile<B> {
    /// Creates a tile using the standard catalog on a white background.
    pub fn new(backend: B) -> Self {
        Self::with_catalog(backend, PatternCatalog::standard())
    }

    /// Creates a tile using a custom catalog.
    pub fn with_catalog(backend: B, catalog: PatternCatalog) -> Self {
        Self {
            backend,
            catalog,
            background: Srgb::new(255, 255, 255),
            canvas: None,
        }
    }

    /// Sets the background color. Takes effect on the next allocation.
    pub fn with_background(mut self, background: Srgb<u8>) -> Self {
        self.background = background;
        self.canvas = None;
        self
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    /// Current working canvas size, if allocated.
    pub fn size(&self) -> Option<u32> {
        self.canvas.as_ref().map(|c| c.size)
    }

    fn apply_transform(&self, image: &mut B::Image, transform: TileTransform, fill: B::Color) {
        if transform.flip_horizontal() {
            self.backend.flip(image, FlipAxis::Horizontal);
        }
        if transform.flip_vertical() {
            self.backend.flip(image, FlipAxis::Vertical);
        }
        if let Some(rotation) = Rotation::from_quarter_turns(transform.quarter_turns()) {
            *image = self.backend.rotate(image, rotation, fill);
        }
    }
}

impl<B: RasterBackend> Tile<B> for PatternTile<B> {
    fn minimum_size(&self) -> u32 {
        MINIMUM_TILE_SIZE
    }

    fn allocate(&mut self, size: u32) -> Result<()> {
        if self.size() == Some(size) {
            return Ok(());
        }
        let background = self.backend.allocate_color(
            self.background.red,
            self.background.green,
            self.background.blue,
        );
        let image = self.backend.create_canvas(size, size, background)?;
        debug!(size, antialias = self.backend.supports_antialias(), "allocated tile canvas");
        self.canvas = Some(Canvas {
            size,
            image,
            background,
        });
        Ok(())
    }

    fn free(&mut self) {
        if self.canvas.take().is_some() {
            debug!("freed tile canvas");
        }
    }

    fn is_allocated(&self) -> bool {
        self.canvas.is_some()
    }

    fn color(&mut self, red: u8, green: u8, blue: u8) -> Result<B::Color> {
        if self.canvas.is_none() {
            return Err(IdenticonError::NotAllocated("tile canvas"));
        }
        let mixed = mix_contrast(red, green, blue);
        Ok(self.backend.allocate_color(mixed.red, mixed.green, mixed.blue))
    }

    fn draw(&mut self, shape: u32, color: B::Color) -> Result<B::Image> {
        let Some(mut canvas) = self.canvas.take() else {
            return Err(IdenticonError::NotAllocated("tile canvas"));
        };
        let pattern = self.catalog.resolve(shape);
        trace!(shape, base = pattern.base_index, transform = pattern.transform.code(), "drawing tile");

        let size = canvas.size;
        self.backend
            .fill_rect(&mut canvas.image, RectPx::from_size(size, size), canvas.background);

        let result = match pattern.polygon {
            None => Ok(canvas.image.clone()),
            Some(polygon) => {
                let scale = size as f32;
                let points: Vec<(f32, f32)> =
                    polygon.iter().map(|&(x, y)| (x * scale, y * scale)).collect();
                self.backend
                    .fill_polygon(&mut canvas.image, &points, color, true)
                    .map(|()| {
                        let mut image = canvas.image.clone();
                        self.apply_transform(&mut image, pattern.transform, canvas.background);
                        image
                    })
            }
        };

        self.canvas = Some(canvas);
        result
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ImageBackend;
    use crate::tile::PatternEntry;
    use image::RgbaImage;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn allocated(size: u32) -> PatternTile<ImageBackend> {
        let mut tile = PatternTile::new(ImageBackend::without_antialias());
        tile.allocate(size).unwrap();
        tile
    }

    fn black(tile: &mut PatternTile<ImageBackend>) -> Srgb<u8> {
        tile.color(0, 0, 0).unwrap()
    }

    fn pixel(image: &RgbaImage, x: u32, y: u32) -> [u8; 4] {
        image.get_pixel(x, y).0
    }

    #[test]
    fn minimum_size_is_three() {
        assert_eq!(PatternTile::new(ImageBackend::new()).minimum_size(), 3);
    }

    #[test]
    fn draw_requires_allocation() {
        let mut tile = PatternTile::new(ImageBackend::new());
        assert!(!tile.is_allocated());
        assert!(matches!(
            tile.color(0, 0, 0),
            Err(IdenticonError::NotAllocated(_))
        ));
        assert!(matches!(
            tile.draw(1, Srgb::new(0, 0, 0)),
            Err(IdenticonError::NotAllocated(_))
        ));
    }

    #[test]
    fn allocate_is_idempotent_and_free_releases() {
        let mut tile = allocated(9);
        assert_eq!(tile.size(), Some(9));
        tile.allocate(9).unwrap();
        assert_eq!(tile.size(), Some(9));
        tile.allocate(12).unwrap();
        assert_eq!(tile.size(), Some(12));
        tile.free();
        assert!(!tile.is_allocated());
        assert!(matches!(tile.draw(0, Srgb::new(0, 0, 0)), Err(IdenticonError::NotAllocated(_))));
    }

    #[test]
    fn color_applies_contrast_mix() {
        let mut tile = allocated(3);
        assert_eq!(tile.color(0xff, 0xff, 0xff).unwrap(), Srgb::new(0, 0, 0));
        assert_eq!(tile.color(0x10, 0x20, 0x30).unwrap(), Srgb::new(0x10, 0x20, 0x30));
    }

    #[test]
    fn empty_pattern_is_background_only() {
        let mut tile = allocated(9);
        let color = black(&mut tile);
        let image = tile.draw(0, color).unwrap();
        assert_eq!(image.dimensions(), (9, 9));
        assert!(image.pixels().all(|p| p.0 == WHITE));
    }

    #[test]
    fn fill_pattern_covers_upper_right_half() {
        let mut tile = allocated(9);
        let color = black(&mut tile);
        let image = tile.draw(22, color).unwrap();
        assert_eq!(pixel(&image, 7, 1), BLACK);
        assert_eq!(pixel(&image, 1, 7), WHITE);
    }

    #[test]
    fn border_vertices_cover_edge_pixels() {
        const SIZE: u32 = 9;
        let red_channel = |image: &RgbaImage, x: u32, y: u32| image.get_pixel(x, y).0[0];
        for backend in [ImageBackend::new(), ImageBackend::without_antialias()] {
            let mut tile = PatternTile::new(backend);
            tile.allocate(SIZE).unwrap();
            let color = black(&mut tile);

            // fill: top row and right column lie on polygon edges
            let fill = tile.draw(22, color).unwrap();
            for i in 1..SIZE {
                assert_eq!(red_channel(&fill, i, 0), 0, "{backend:?} fill top row at {i}");
                let y = i - 1;
                assert_eq!(red_channel(&fill, SIZE - 1, y), 0, "{backend:?} fill right column at {y}");
            }

            // bowknot: both side columns lie on polygon edges
            let bowknot = tile.draw(13, color).unwrap();
            for y in 1..SIZE - 1 {
                assert_eq!(red_channel(&bowknot, 0, y), 0, "{backend:?} bowknot left column at {y}");
                assert_eq!(red_channel(&bowknot, SIZE - 1, y), 0, "{backend:?} bowknot right column at {y}");
            }
            assert_eq!(red_channel(&bowknot, SIZE / 2, 0), 255, "{backend:?} bowknot top");
        }
    }

    #[test]
    fn rotation_alias_rotates_counter_clockwise() {
        let mut tile = allocated(9);
        let color = black(&mut tile);
        // isosceles right triangle: upper-left corner filled
        let base = tile.draw(5, color).unwrap();
        assert_eq!(pixel(&base, 1, 1), BLACK);
        assert_eq!(pixel(&base, 7, 7), WHITE);

        // one quarter turn counter-clockwise moves it to the lower-left
        let turned = tile.draw(6, color).unwrap();
        assert_eq!(pixel(&turned, 1, 7), BLACK);
        assert_eq!(pixel(&turned, 7, 1), WHITE);
    }

    #[test]
    fn flip_alias_mirrors_before_rotating() {
        let mut tile = allocated(9);
        let color = black(&mut tile);
        let base = tile.draw(17, color).unwrap();
        let flipped = tile.draw(19, color).unwrap();
        for y in 0..9 {
            for x in 0..9 {
                assert_eq!(pixel(&flipped, x, y), pixel(&base, 8 - x, y));
            }
        }
    }

    #[test]
    fn draw_returns_independent_images() {
        let mut tile = allocated(9);
        let color = black(&mut tile);
        let mut first = tile.draw(22, color).unwrap();
        first.pixels_mut().for_each(|p| p.0 = BLACK);
        let second = tile.draw(22, color).unwrap();
        assert_eq!(pixel(&second, 1, 7), WHITE);
    }

    #[test]
    fn custom_catalog_and_background() {
        let catalog = PatternCatalog::new(vec![PatternEntry::Empty]).unwrap();
        let mut tile = PatternTile::with_catalog(ImageBackend::new(), catalog)
            .with_background(Srgb::new(0, 0, 255));
        tile.allocate(4).unwrap();
        let color = tile.color(255, 0, 0).unwrap();
        let image = tile.draw(7, color).unwrap();
        assert!(image.pixels().all(|p| p.0 == [0, 0, 255, 255]));
    }
}
