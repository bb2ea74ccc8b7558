//! identicon-renderer: deterministic symmetric identicons from hex hashes
//!
//! A hash is decoded into a handful of colors and one shape index per unique
//! grid position. Each shape is rendered as a square tile from a fixed
//! pattern catalog, then copied into every rotated and mirrored slot of the
//! grid so the finished icon has four-fold rotational symmetry.
//!
//! # Example
//!
//! ```
//! use identicon_renderer::{Identicon, IdenticonConfig, PngOptions};
//!
//! let config = IdenticonConfig::new(64).with_tiles(6).with_colors(2);
//! let mut icon = Identicon::standard(config).unwrap();
//!
//! let hash = "9e107d9d372bb6826bd81d3542a419d6";
//! assert!(hash.len() >= icon.minimum_hash_length());
//!
//! let png = icon.draw(hash).unwrap().png_bytes(None, PngOptions::default()).unwrap();
//! assert!(!png.is_empty());
//! ```
//!
//! # Custom tiles and backends
//!
//! The composer is generic over a [`RasterBackend`] and a [`Tile`] renderer.
//! [`PatternTile`] accepts any validated [`PatternCatalog`], which can also be
//! loaded from JSON:
//!
//! ```
//! use identicon_renderer::{Identicon, IdenticonConfig, ImageBackend, PatternCatalog, PatternTile};
//!
//! let catalog = PatternCatalog::from_json(
//!     r#"["empty", {"polygon": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]}, {"transform": 2}]"#,
//! ).unwrap();
//! let backend = ImageBackend::new();
//! let tile = PatternTile::with_catalog(backend, catalog);
//! let mut icon = Identicon::new(IdenticonConfig::new(32), tile, backend).unwrap();
//! icon.draw("00000000000000000000000000000000").unwrap();
//! ```

mod color;
mod config;
mod error;
mod hash;
mod identicon;
mod layout;
mod output;
mod raster;
mod tile;

pub use color::{mix_contrast, parse_rgb};
pub use config::IdenticonConfig;
pub use error::{IdenticonError, Result};
pub use hash::{HashCursor, validate_hash};
pub use identicon::Identicon;
pub use layout::{Cell, Layout, MIRRORED_SLOT, Placement, SLOT_COUNT, placements, sector_size};
pub use output::PNG_CONTENT_TYPE;
pub use raster::{
    FlipAxis, ImageBackend, PngCompression, PngFilter, PngOptions, RasterBackend, RectPx, Rotation,
};
pub use tile::{PatternCatalog, PatternEntry, PatternTile, ResolvedPattern, Tile, TileTransform};
