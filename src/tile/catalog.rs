//! Pattern catalog shared by tile renderers.
//!
//! A catalog is an ordered list of [`PatternEntry`] values. Shape indices are
//! taken modulo the catalog length. A [`PatternEntry::Transform`] entry is an
//! alias: it reuses the nearest polygon (or empty entry) before it, drawn
//! with its own rotation/flip code.

use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use crate::error::{IdenticonError, Result};

// ============================================================================
// TileTransform
// ============================================================================

/// 4-bit rotation/flip code applied to a rendered tile.
///
/// Bits 0-1 hold the number of counter-clockwise quarter turns, bit 2 flips
/// horizontally and bit 3 flips vertically. Flips are applied before the
/// rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct TileTransform(u8);

impl TileTransform {
    pub const IDENTITY: Self = Self(0);

    const ANGLE_MASK: u8 = 0x3;
    const FLIP_H: u8 = 0x4;
    const FLIP_V: u8 = 0x8;

    /// Creates a transform from its 4-bit code; higher bits are discarded.
    pub fn new(code: u8) -> Self {
        Self(code & 0xf)
    }

    pub fn code(self) -> u8 {
        self.0
    }

    /// Counter-clockwise quarter turns (0-3).
    pub fn quarter_turns(self) -> u8 {
        self.0 & Self::ANGLE_MASK
    }

    pub fn flip_horizontal(self) -> bool {
        self.0 & Self::FLIP_H != 0
    }

    pub fn flip_vertical(self) -> bool {
        self.0 & Self::FLIP_V != 0
    }

    pub fn is_identity(self) -> bool {
        self.0 == 0
    }
}

// ============================================================================
// PatternEntry
// ============================================================================

/// One entry of a pattern catalog.
///
/// # JSON Format
///
/// ```json
/// ["empty", { "polygon": [[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]] }, { "transform": 1 }]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PatternEntry {
    /// Background only.
    Empty,
    /// Polygon vertices in unit-square coordinates.
    Polygon(Vec<(f32, f32)>),
    /// Alias of the preceding shape with a rotation/flip code.
    Transform(TileTransform),
}

/// A catalog lookup result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPattern<'a> {
    /// Index of the entry holding the shape (after alias resolution).
    pub base_index: usize,
    /// Unit-square polygon, `None` for an empty entry.
    pub polygon: Option<&'a [(f32, f32)]>,
    pub transform: TileTransform,
}

// ============================================================================
// PatternCatalog
// ============================================================================

/// Immutable, cheaply cloneable list of tile patterns.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternCatalog {
    entries: Arc<[PatternEntry]>,
}

static STANDARD: LazyLock<PatternCatalog> = LazyLock::new(|| PatternCatalog {
    entries: standard_entries().into(),
});

fn polygon(points: &[(f32, f32)]) -> PatternEntry {
    PatternEntry::Polygon(points.to_vec())
}

fn transform(code: u8) -> PatternEntry {
    PatternEntry::Transform(TileTransform::new(code))
}

fn standard_entries() -> Vec<PatternEntry> {
    vec![
        PatternEntry::Empty,
        // regular triangle
        polygon(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)]),
        transform(1),
        transform(2),
        transform(3),
        // isosceles right triangle
        polygon(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]),
        transform(1),
        transform(2),
        transform(3),
        // isosceles triangle
        polygon(&[(0.0, 0.0), (1.0, 0.5), (0.5, 1.0)]),
        transform(1),
        transform(2),
        transform(3),
        // bowknot
        polygon(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]),
        transform(1),
        // rotated bowknot
        polygon(&[(0.5, 0.0), (0.5, 1.0), (1.0, 0.5), (0.0, 0.5)]),
        transform(1),
        // parallelogram
        polygon(&[(0.0, 0.0), (0.5, 0.0), (1.0, 1.0), (0.5, 1.0)]),
        transform(1),
        transform(4),
        transform(5),
        // rotated square
        polygon(&[(0.5, 0.0), (1.0, 0.5), (0.5, 1.0), (0.0, 0.5)]),
        // fill
        polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]),
    ]
}

impl Default for PatternCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl PatternCatalog {
    /// The built-in catalog of 23 entries.
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    /// Builds a catalog, checking that every alias has a shape to refer to
    /// and that polygons stay inside the unit square.
    pub fn new(entries: Vec<PatternEntry>) -> Result<Self> {
        if entries.is_empty() {
            return Err(IdenticonError::InvalidCatalog("catalog is empty".into()));
        }
        if matches!(entries[0], PatternEntry::Transform(_)) {
            return Err(IdenticonError::InvalidCatalog(
                "first entry must be a shape, not a transform".into(),
            ));
        }
        for (index, entry) in entries.iter().enumerate() {
            let PatternEntry::Polygon(points) = entry else {
                continue;
            };
            if points.len() < 3 {
                return Err(IdenticonError::InvalidCatalog(format!(
                    "polygon at {index} has {} points, at least 3 required",
                    points.len()
                )));
            }
            if points
                .iter()
                .any(|&(x, y)| !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y))
            {
                return Err(IdenticonError::InvalidCatalog(format!(
                    "polygon at {index} leaves the unit square"
                )));
            }
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    /// Parses and validates a catalog from a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Serializes the catalog entries to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.entries)?)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[PatternEntry] {
        &self.entries
    }

    /// Looks up the pattern for a shape index (taken modulo the catalog size).
    pub fn resolve(&self, shape: u32) -> ResolvedPattern<'_> {
        let mut index = shape as usize % self.entries.len();
        let mut transform = TileTransform::IDENTITY;
        if let PatternEntry::Transform(code) = self.entries[index] {
            transform = code;
            while let PatternEntry::Transform(_) = self.entries[index] {
                // entry 0 is never a transform, so this stops
                index -= 1;
            }
        }
        let polygon = match &self.entries[index] {
            PatternEntry::Polygon(points) => Some(points.as_slice()),
            _ => None,
        };
        ResolvedPattern {
            base_index: index,
            polygon,
            transform,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn transform_bits() {
        let t = TileTransform::new(0b1101);
        assert_eq!(t.quarter_turns(), 1);
        assert!(t.flip_horizontal());
        assert!(t.flip_vertical());
        assert!(!t.is_identity());
        assert_eq!(TileTransform::new(0x1f).code(), 0xf);
        assert!(TileTransform::IDENTITY.is_identity());
    }

    #[test]
    fn standard_catalog_layout() {
        let catalog = PatternCatalog::standard();
        assert_eq!(catalog.len(), 23);
        assert_eq!(catalog.entries()[0], PatternEntry::Empty);
        assert!(PatternCatalog::new(catalog.entries().to_vec()).is_ok());
    }

    #[test]
    fn resolve_polygon_entry() {
        let catalog = PatternCatalog::standard();
        let resolved = catalog.resolve(1);
        assert_eq!(resolved.base_index, 1);
        assert_eq!(resolved.polygon, Some(&[(0.0, 0.0), (1.0, 0.0), (0.5, 1.0)][..]));
        assert_eq!(resolved.transform, TileTransform::IDENTITY);
    }

    #[test]
    fn resolve_alias_walks_back() {
        let catalog = PatternCatalog::standard();
        let resolved = catalog.resolve(4);
        assert_eq!(resolved.base_index, 1);
        assert_eq!(resolved.transform.quarter_turns(), 3);

        // parallelogram flip aliases
        let resolved = catalog.resolve(20);
        assert_eq!(resolved.base_index, 17);
        assert_eq!(resolved.transform, TileTransform::new(5));
    }

    #[test]
    fn resolve_empty_entry() {
        let catalog = PatternCatalog::standard();
        let resolved = catalog.resolve(0);
        assert_eq!(resolved.polygon, None);
        assert_eq!(resolved.transform, TileTransform::IDENTITY);
    }

    #[test]
    fn resolve_wraps_modulo_catalog_size() {
        let catalog = PatternCatalog::standard();
        let n = catalog.len() as u32;
        for k in 0..n * 2 {
            assert_eq!(catalog.resolve(k), catalog.resolve(k + n));
            assert_eq!(catalog.resolve(k), catalog.resolve(k + 5 * n));
        }
    }

    #[test]
    fn new_rejects_malformed_catalogs() {
        assert!(matches!(
            PatternCatalog::new(vec![]),
            Err(IdenticonError::InvalidCatalog(_))
        ));
        assert!(matches!(
            PatternCatalog::new(vec![transform(1), PatternEntry::Empty]),
            Err(IdenticonError::InvalidCatalog(_))
        ));
        assert!(matches!(
            PatternCatalog::new(vec![polygon(&[(0.0, 0.0), (1.0, 1.0)])]),
            Err(IdenticonError::InvalidCatalog(_))
        ));
        assert!(matches!(
            PatternCatalog::new(vec![polygon(&[(0.0, 0.0), (1.5, 0.0), (0.0, 1.0)])]),
            Err(IdenticonError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn catalog_json() {
        let json = r#"["empty", {"polygon": [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]]}, {"transform": 2}]"#;
        let catalog = PatternCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 3);
        let resolved = catalog.resolve(5);
        assert_eq!(resolved.base_index, 1);
        assert_eq!(resolved.transform.quarter_turns(), 2);

        let restored = PatternCatalog::from_json(&catalog.to_json().unwrap()).unwrap();
        assert_eq!(restored, catalog);
    }
}
