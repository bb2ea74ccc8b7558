//! Hash decoding and symmetric tile placement.
//!
//! Everything here is pure arithmetic: [`Layout::decode`] turns a hash into
//! colors and per-cell shape indices, and [`placements`] lists where every
//! cell's tile is copied on the canvas. The composer only pairs the two up
//! with raster operations.
//!
//! Cells enumerate the triangular sector `0 <= y <= x < x_end`. Each cell is
//! copied to up to eight slots: four corner-to-corner rotations, then four
//! rotations of the mirrored tile.

use palette::Srgb;

use crate::color::parse_rgb;
use crate::config::IdenticonConfig;
use crate::error::Result;
use crate::hash::{HashCursor, validate_hash};

// ============================================================================
// Decoding
// ============================================================================

/// One unique position of the triangular sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Sector column, `0..x_end`.
    pub x: u32,
    /// Sector row, `0..=x`.
    pub y: u32,
    /// Index into [`Layout::colors`].
    pub color_index: usize,
    /// Running shape accumulator for this cell (catalog index before modulo).
    pub shape: u32,
}

/// Everything decoded from a hash for one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Colors as read from the hash, before contrast mixing.
    pub colors: Vec<Srgb<u8>>,
    pub base_color: u8,
    /// Bit 0: +1, bit 1: +x, bit 2: +y, bit 3: +1 while `x <= x_mid`.
    pub color_pattern: u8,
    /// Seed of the shape accumulator.
    pub shape_seed: u8,
    /// Cells in drawing order.
    pub cells: Vec<Cell>,
    /// Hex digits read from the hash.
    pub digits_consumed: usize,
}

impl Layout {
    /// Decodes `hash` for `config`.
    ///
    /// The config and the hash prefix are validated before anything is
    /// decoded, so a short or malformed hash never yields a partial layout.
    pub fn decode(config: &IdenticonConfig, hash: &str) -> Result<Self> {
        config.validate()?;
        validate_hash(hash, config.minimum_hash_length())?;

        let mut cursor = HashCursor::new(hash);
        let colors = (0..config.colors)
            .map(|_| parse_rgb(&mut cursor))
            .collect::<Result<Vec<_>>>()?;
        let base_color = cursor.nibble()?;
        let color_pattern = cursor.nibble()?;
        let shape_seed = cursor.nibble()?;

        let x_end = config.x_end();
        let x_mid = x_end.div_ceil(2);
        let mut shape = u32::from(shape_seed);
        let mut cells = Vec::with_capacity(sector_size(x_end));
        for x in 0..x_end {
            for y in 0..=x {
                let mut color = u32::from(base_color);
                if color_pattern & 0x1 != 0 {
                    color += 1;
                }
                if color_pattern & 0x2 != 0 {
                    color += x;
                }
                if color_pattern & 0x4 != 0 {
                    color += y;
                }
                if color_pattern & 0x8 != 0 && x <= x_mid {
                    color += 1;
                }
                shape += u32::from(cursor.nibble()?);
                cells.push(Cell {
                    x,
                    y,
                    color_index: (color % config.colors) as usize,
                    shape,
                });
            }
        }

        Ok(Self {
            colors,
            base_color,
            color_pattern,
            shape_seed,
            cells,
            digits_consumed: cursor.consumed(),
        })
    }
}

/// Number of cells in the triangular sector of width `x_end`.
pub fn sector_size(x_end: u32) -> usize {
    let x_end = x_end as usize;
    x_end * (x_end + 1) / 2
}

// ============================================================================
// Placement
// ============================================================================

/// A slot's pixel offset and how it moves through the grid.
#[derive(Debug, Clone, Copy)]
struct Slot {
    x: i64,
    y: i64,
    /// Step per sector row (`y`).
    inner: (i64, i64),
    /// Step per sector column (`x`).
    outer: (i64, i64),
}

impl Slot {
    const fn new(x: i64, y: i64, inner: (i64, i64), outer: (i64, i64)) -> Self {
        Self { x, y, inner, outer }
    }
}

/// Number of symmetric copies of a general cell.
pub const SLOT_COUNT: usize = 8;

/// Slots 0-3 hold the tile rotated 0, 90, 180 and 270 degrees clockwise.
/// Slots 4-7 hold the horizontally mirrored tile with the same rotations.
pub const MIRRORED_SLOT: usize = 4;

fn initial_slots(tiles: u32, tile_size: u32) -> [Slot; SLOT_COUNT] {
    let br = i64::from(tile_size) * (i64::from(tiles) - 1);
    [
        // corners and sides
        Slot::new(0, 0, (0, 1), (1, 0)),
        Slot::new(br, 0, (-1, 0), (0, 1)),
        Slot::new(br, br, (0, -1), (-1, 0)),
        Slot::new(0, br, (1, 0), (0, -1)),
        // mirrored counterparts
        Slot::new(br, 0, (0, 1), (-1, 0)),
        Slot::new(br, br, (-1, 0), (0, -1)),
        Slot::new(0, br, (0, -1), (1, 0)),
        Slot::new(0, 0, (1, 0), (0, 1)),
    ]
}

/// One copy of a cell's tile onto the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Index into [`Layout::cells`].
    pub cell: usize,
    /// Symmetry slot, `0..SLOT_COUNT`.
    pub slot: usize,
    /// Left edge in canvas pixels.
    pub x: u32,
    /// Top edge in canvas pixels.
    pub y: u32,
}

/// Lists every tile copy for a `tiles x tiles` grid, in drawing order.
///
/// Cells on the diagonal or in the first column are their own mirror image
/// and only get slots 0-3. In an odd grid the middle column also stops at
/// slot 3, and the exact center cell is copied once.
pub fn placements(tiles: u32, tile_size: u32) -> Vec<Placement> {
    let step = i64::from(tile_size);
    let x_end = tiles.div_ceil(2);
    let center = (tiles & 1 == 1).then_some(tiles >> 1);

    let mut out = Vec::with_capacity(tiles as usize * tiles as usize);
    let mut outer = initial_slots(tiles, tile_size);
    let mut cell = 0;
    for x in 0..x_end {
        let in_center_column = center == Some(x);
        let mut inner = outer;
        for y in 0..=x {
            for (index, slot) in inner.iter_mut().enumerate() {
                if index == MIRRORED_SLOT && (y == x || x == 0) {
                    break;
                }
                if index < MIRRORED_SLOT || !in_center_column {
                    out.push(Placement {
                        cell,
                        slot: index,
                        x: slot.x as u32,
                        y: slot.y as u32,
                    });
                    if in_center_column && center == Some(y) {
                        break;
                    }
                }
                slot.x += slot.inner.0 * step;
                slot.y += slot.inner.1 * step;
            }
            cell += 1;
        }
        for slot in outer.iter_mut() {
            slot.x += slot.outer.0 * step;
            slot.y += slot.outer.1 * step;
        }
    }
    out
}

// ============================================================================
// Tests
// ============================================================================
