//! Identicon composer.
//!
//! [`Identicon`] owns the full-size canvas and drives a [`Tile`] renderer:
//! it decodes the hash into a [`Layout`], renders one tile per sector cell
//! and copies it into every symmetric slot listed by [`placements`].

use tracing::debug;

use crate::config::IdenticonConfig;
use crate::error::{IdenticonError, Result};
use crate::layout::{Layout, MIRRORED_SLOT, Placement, placements};
use crate::raster::{FlipAxis, ImageBackend, RasterBackend, Rotation};
use crate::tile::{PatternTile, Tile};

// ============================================================================
// Identicon
// ============================================================================

/// Renders identicons for one configuration.
///
/// Build it once and call [`draw`](Self::draw) for every hash. The canvas is
/// allocated on the first draw and reused afterwards; [`free`](Self::free)
/// releases it together with the tile's working canvas.
///
/// An `Identicon` is single-owner mutable state. Use one instance per thread
/// or serialize access externally.
///
/// # Example
///
/// ```
/// use identicon_renderer::{Identicon, IdenticonConfig};
///
/// let mut icon = Identicon::standard(IdenticonConfig::new(48)).unwrap();
/// let hash = "d41d8cd98f00b204e9800998ecf8427e";
/// let image = icon.draw(hash).unwrap().image(None).unwrap();
/// assert_eq!(image.dimensions(), (48, 48));
/// ```
pub struct Identicon<B: RasterBackend, T: Tile<B>> {
    config: IdenticonConfig,
    backend: B,
    tile: T,
    tile_size: u32,
    placements: Vec<Placement>,
    background: B::Color,
    canvas: Option<B::Image>,
    drawn: bool,
}

impl Identicon<ImageBackend, PatternTile<ImageBackend>> {
    /// Creates a composer with the default backend and pattern tiles.
    pub fn standard(config: IdenticonConfig) -> Result<Self> {
        Self::with_backend(config, ImageBackend::new())
    }
}

impl<B: RasterBackend + Clone> Identicon<B, PatternTile<B>> {
    /// Creates a composer drawing standard pattern tiles on `backend`.
    pub fn with_backend(config: IdenticonConfig, backend: B) -> Result<Self> {
        Self::new(config, PatternTile::new(backend.clone()), backend)
    }
}

impl<B: RasterBackend, T: Tile<B>> Identicon<B, T> {
    /// Creates a composer.
    ///
    /// Fails with `InvalidConfiguration` for zero sizes or when the canvas
    /// side would overflow `u32`.
    pub fn new(config: IdenticonConfig, tile: T, backend: B) -> Result<Self> {
        config.validate()?;
        let tile_size = config.tile_size(tile.minimum_size(), backend.supports_antialias())?;
        debug!(
            tiles = config.tiles,
            colors = config.colors,
            high_quality = config.high_quality,
            tile_size,
            "configured identicon"
        );
        let background = backend.allocate_color(255, 255, 255);
        Ok(Self {
            config,
            placements: placements(config.tiles, tile_size),
            backend,
            tile,
            tile_size,
            background,
            canvas: None,
            drawn: false,
        })
    }

    pub fn config(&self) -> &IdenticonConfig {
        &self.config
    }

    /// Pixel size of one sub-tile at native resolution.
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Side of the native canvas, `tiles * tile_size`.
    pub fn canvas_size(&self) -> u32 {
        self.config.tiles * self.tile_size
    }

    /// Number of hex digits a hash must supply.
    pub fn minimum_hash_length(&self) -> usize {
        self.config.minimum_hash_length()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Draws the icon for `hash` into the internal canvas.
    ///
    /// The hash is checked before any drawing starts. On error no image is
    /// available until the next successful draw.
    pub fn draw(&mut self, hash: &str) -> Result<&mut Self> {
        self.drawn = false;
        let layout = Layout::decode(&self.config, hash)?;
        self.render(&layout)?;
        self.drawn = true;
        Ok(self)
    }

    fn render(&mut self, layout: &Layout) -> Result<()> {
        self.tile.allocate(self.tile_size)?;
        let colors = layout
            .colors
            .iter()
            .map(|c| self.tile.color(c.red, c.green, c.blue))
            .collect::<Result<Vec<_>>>()?;

        let mut canvas = match self.canvas.take() {
            Some(canvas) => canvas,
            None => {
                let size = self.canvas_size();
                debug!(size, "allocated identicon canvas");
                self.backend.create_canvas(size, size, self.background)?
            }
        };

        let result = self.place_cells(layout, &colors, &mut canvas);
        self.canvas = Some(canvas);
        result?;

        debug!(
            digits = layout.digits_consumed,
            cells = layout.cells.len(),
            placements = self.placements.len(),
            "drew identicon"
        );
        Ok(())
    }

    fn place_cells(&mut self, layout: &Layout, colors: &[B::Color], canvas: &mut B::Image) -> Result<()> {
        let mut pending = self.placements.iter().peekable();
        for (index, cell) in layout.cells.iter().enumerate() {
            let mut image = self.tile.draw(cell.shape, colors[cell.color_index])?;
            while let Some(placement) = pending.next_if(|p| p.cell == index) {
                // each slot holds the previous slot's tile turned a quarter clockwise
                if placement.slot > 0 {
                    image = self.backend.rotate(&image, Rotation::Ccw270, self.background);
                }
                if placement.slot == MIRRORED_SLOT {
                    self.backend.flip(&mut image, FlipAxis::Horizontal);
                }
                self.backend
                    .copy_region(&image, canvas, placement.x, placement.y);
            }
        }
        Ok(())
    }

    /// The native-resolution canvas of the last successful draw.
    pub fn canvas(&self) -> Result<&B::Image> {
        match (&self.canvas, self.drawn) {
            (Some(canvas), true) => Ok(canvas),
            _ => Err(IdenticonError::NotAllocated("identicon canvas")),
        }
    }

    /// Returns the drawn icon resampled to `size` (default `max_size`).
    pub fn image(&self, size: Option<u32>) -> Result<B::Image> {
        let canvas = self.canvas()?;
        let size = size.unwrap_or(self.config.max_size);
        if size == 0 {
            return Err(IdenticonError::InvalidConfiguration(
                "output size must be positive".into(),
            ));
        }
        Ok(self.backend.resample(canvas, size, size))
    }

    /// Releases the canvas and the tile's working canvas.
    pub fn free(&mut self) {
        self.tile.free();
        self.canvas = None;
        self.drawn = false;
    }
}

// ============================================================================
// Tests
// ============================================================================
