//! Serializable identicon configuration.
//!
//! An [`IdenticonConfig`] captures everything that changes the hash-to-pixel
//! mapping. Two renderers built from equal configurations (and the same tile
//! style and backend) produce identical images for the same hash.
//!
//! # Example
//!
//! ```
//! use identicon_renderer::IdenticonConfig;
//!
//! let config = IdenticonConfig::new(64).with_tiles(5).with_colors(3);
//! assert_eq!(config.minimum_hash_length(), 3 * 6 + 3 + 6);
//!
//! let json = config.to_json().unwrap();
//! let restored = IdenticonConfig::from_json(&json).unwrap();
//! assert_eq!(restored, config);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{IdenticonError, Result};

// ============================================================================
// IdenticonConfig
// ============================================================================

/// Layout parameters for an identicon.
///
/// # JSON Format
///
/// ```json
/// {
///   "maxSize": 64,
///   "tiles": 6,
///   "colors": 2,
///   "highQuality": true
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "clap", derive(clap::Args))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IdenticonConfig {
    /// Default output size in pixels.
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 64))]
    pub max_size: u32,

    /// Number of sub-tiles along one side of the icon.
    #[serde(default = "default_tiles")]
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 6))]
    pub tiles: u32,

    /// Number of distinct fill colors decoded from the hash.
    #[serde(default = "default_colors")]
    #[cfg_attr(feature = "clap", arg(long, default_value_t = 2))]
    pub colors: u32,

    /// Render at a larger tile size and downsample for smoother edges.
    #[serde(default = "default_true")]
    #[cfg_attr(feature = "clap", arg(long, default_value_t = true, action = clap::ArgAction::Set))]
    pub high_quality: bool,
}

fn default_tiles() -> u32 {
    6
}

fn default_colors() -> u32 {
    2
}

fn default_true() -> bool {
    true
}

impl Default for IdenticonConfig {
    fn default() -> Self {
        Self::new(64)
    }
}

impl IdenticonConfig {
    /// Creates a config with the default grid (6 tiles, 2 colors, high quality).
    pub fn new(max_size: u32) -> Self {
        Self {
            max_size,
            tiles: default_tiles(),
            colors: default_colors(),
            high_quality: true,
        }
    }

    /// Sets the number of sub-tiles per side.
    pub fn with_tiles(mut self, tiles: u32) -> Self {
        self.tiles = tiles;
        self
    }

    /// Sets the number of colors.
    pub fn with_colors(mut self, colors: u32) -> Self {
        self.colors = colors;
        self
    }

    /// Enables or disables oversampling.
    pub fn with_high_quality(mut self, high_quality: bool) -> Self {
        self.high_quality = high_quality;
        self
    }

    /// Rejects configurations that cannot be drawn.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(IdenticonError::InvalidConfiguration(
                "maxSize must be positive".into(),
            ));
        }
        if self.tiles == 0 {
            return Err(IdenticonError::InvalidConfiguration(
                "tiles must be positive".into(),
            ));
        }
        if self.colors == 0 {
            return Err(IdenticonError::InvalidConfiguration(
                "colors must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Number of grid columns in one symmetric arm, `ceil(tiles / 2)`.
    pub fn x_end(&self) -> u32 {
        self.tiles.div_ceil(2)
    }

    /// Exact number of hex digits the decoder consumes.
    ///
    /// Six digits per color, three header digits, and one digit for every
    /// position of the triangular sector `0 <= y <= x < x_end`.
    pub fn minimum_hash_length(&self) -> usize {
        let x_end = self.x_end() as usize;
        self.colors as usize * 6 + 3 + x_end * (x_end + 1) / 2
    }

    /// Pixel size of one sub-tile at native resolution.
    ///
    /// When oversampling is requested from a backend that cannot antialias,
    /// the target size is doubled first. Oversampled tiles are rounded up to
    /// a multiple of `tiles * min_tile_size` so the finest pattern stays on
    /// whole pixels. Fails when the tile or the full canvas side
    /// (`tiles * tile_size`) does not fit in `u32`.
    pub fn tile_size(&self, min_tile_size: u32, antialias: bool) -> Result<u32> {
        let tiles = self.tiles.max(1);
        let overflow = || {
            IdenticonError::InvalidConfiguration(format!(
                "canvas for {} tiles at max size {} does not fit in u32",
                self.tiles, self.max_size
            ))
        };

        let mut size = self.max_size;
        if self.high_quality && !antialias {
            size = size.checked_mul(2).ok_or_else(overflow)?;
        }
        let tile_size = if self.high_quality {
            let res = tiles.checked_mul(min_tile_size.max(1)).ok_or_else(overflow)?;
            let step = tiles.checked_mul(res).ok_or_else(overflow)?;
            size.div_ceil(step).checked_mul(res).ok_or_else(overflow)?
        } else {
            size.div_ceil(tiles)
        };
        let tile_size = tile_size.max(1);

        tiles.checked_mul(tile_size).ok_or_else(overflow)?;
        Ok(tile_size)
    }

    /// Serializes the config to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the config to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes and validates a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
