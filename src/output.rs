//! PNG output for drawn identicons.
//!
//! Serving an icon over HTTP is left to the caller; [`PNG_CONTENT_TYPE`] is
//! the header value to send with the bytes from [`Identicon::png_bytes`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::identicon::Identicon;
use crate::raster::{PngOptions, RasterBackend};
use crate::tile::Tile;

/// MIME type of the encoded output.
pub const PNG_CONTENT_TYPE: &str = "image/png";

impl<B: RasterBackend, T: Tile<B>> Identicon<B, T> {
    /// Encodes the drawn icon at `size` (default `max_size`) into `writer`.
    pub fn write_png<W: Write>(&self, mut writer: W, size: Option<u32>, options: PngOptions) -> Result<()> {
        let image = self.image(size)?;
        self.backend().encode_png(&image, &mut writer, options)
    }

    /// Encodes the drawn icon into an in-memory PNG.
    pub fn png_bytes(&self, size: Option<u32>, options: PngOptions) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.write_png(&mut bytes, size, options)?;
        Ok(bytes)
    }

    /// Saves the drawn icon as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>, size: Option<u32>, options: PngOptions) -> Result<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_png(&mut writer, size, options)?;
        writer.flush()?;
        debug!(path = %path.display(), "saved identicon");
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IdenticonConfig;
    use crate::error::IdenticonError;

    const HASH: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn png_bytes_decode_to_requested_size() {
        let mut icon = Identicon::standard(IdenticonConfig::new(40)).unwrap();
        icon.draw(HASH).unwrap();

        let bytes = icon.png_bytes(Some(20), PngOptions::fast()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (20, 20));
        assert_eq!(decoded, icon.image(Some(20)).unwrap());
    }

    #[test]
    fn png_output_is_deterministic() {
        let mut icon = Identicon::standard(IdenticonConfig::new(32)).unwrap();
        let first = icon.draw(HASH).unwrap().png_bytes(None, PngOptions::default()).unwrap();
        let second = icon.draw(HASH).unwrap().png_bytes(None, PngOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn png_requires_draw() {
        let icon = Identicon::standard(IdenticonConfig::new(32)).unwrap();
        assert!(matches!(
            icon.png_bytes(None, PngOptions::default()),
            Err(IdenticonError::NotAllocated(_))
        ));
    }

    #[test]
    fn save_png_writes_file() {
        let mut icon = Identicon::standard(IdenticonConfig::new(16)).unwrap();
        icon.draw(HASH).unwrap();

        let path = std::env::temp_dir().join(format!("identicon-{}.png", std::process::id()));
        icon.save_png(&path, None, PngOptions::best_compression()).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(decoded.dimensions(), (16, 16));
    }
}
