//! Tile renderers.
//!
//! A tile renderer draws one square sub-tile for a shape index and a color.
//! The composer only talks to the [`Tile`] trait, so alternative tile styles
//! can be plugged in; [`PatternTile`] is the default, driven by a
//! [`PatternCatalog`].

pub mod catalog;
pub mod pattern;

pub use catalog::{PatternCatalog, PatternEntry, ResolvedPattern, TileTransform};
pub use pattern::PatternTile;

use crate::error::Result;
use crate::raster::RasterBackend;

/// Capability of rendering single identicon sub-tiles.
///
/// A tile owns a working canvas between [`allocate`](Self::allocate) and
/// [`free`](Self::free). It is single-owner state: callers sharing one tile
/// across threads must serialize access themselves.
pub trait Tile<B: RasterBackend> {
    /// Smallest tile size (in pixels) at which every pattern stays legible.
    fn minimum_size(&self) -> u32;

    /// Allocates the working canvas. Re-allocating the current size is a no-op.
    fn allocate(&mut self, size: u32) -> Result<()>;

    /// Releases the working canvas.
    fn free(&mut self);

    /// Returns true between `allocate` and `free`.
    fn is_allocated(&self) -> bool;

    /// Allocates a fill color after applying the contrast mixing rule.
    fn color(&mut self, red: u8, green: u8, blue: u8) -> Result<B::Color>;

    /// Renders the tile for `shape` filled with `color`.
    ///
    /// The returned image is a fresh value that the caller may mutate freely.
    fn draw(&mut self, shape: u32, color: B::Color) -> Result<B::Image>;
}
