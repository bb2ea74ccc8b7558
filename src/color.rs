//! Color decoding and the contrast mixing rule.

use palette::Srgb;

use crate::error::Result;
use crate::hash::HashCursor;

/// Both high bits of a channel; a channel at or above 0xC0 is near-white.
const NEAR_WHITE_MASK: u8 = 0xc0;

/// Reads one RGB triple (two hex digits per channel) from the cursor.
pub fn parse_rgb(cursor: &mut HashCursor<'_>) -> Result<Srgb<u8>> {
    let red = cursor.byte()?;
    let green = cursor.byte()?;
    let blue = cursor.byte()?;
    Ok(Srgb::new(red, green, blue))
}

/// Applies the contrast mixing rule to a decoded color.
///
/// Colors with every channel at or above 0xC0 would vanish against a white
/// background, so some of their channels are inverted. The choice of
/// channels comes from the low three bits of the channel sum (7 when zero):
/// red flips on bit 0, green on bits 0|1, blue on bits 0|2.
pub fn mix_contrast(red: u8, green: u8, blue: u8) -> Srgb<u8> {
    if red & green & blue & NEAR_WHITE_MASK != NEAR_WHITE_MASK {
        return Srgb::new(red, green, blue);
    }

    let mut flags = ((red as u32 + green as u32 + blue as u32) & 0x7) as u8;
    if flags == 0 {
        flags = 0x7;
    }

    let invert = |channel: u8, mask: u8| if flags & mask != 0 { channel ^ 0xff } else { channel };
    Srgb::new(invert(red, 0x1), invert(green, 0x3), invert(blue, 0x5))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_colors_pass_through() {
        assert_eq!(mix_contrast(0, 0, 0), Srgb::new(0, 0, 0));
        assert_eq!(mix_contrast(0xbf, 0xff, 0xff), Srgb::new(0xbf, 0xff, 0xff));
        assert_eq!(mix_contrast(0x12, 0x34, 0x56), Srgb::new(0x12, 0x34, 0x56));
    }

    #[test]
    fn white_is_fully_inverted() {
        // 0xff * 3 = 0x2fd, low bits 0b101: red and blue flip, green flips via bit 0
        assert_eq!(mix_contrast(0xff, 0xff, 0xff), Srgb::new(0, 0, 0));
    }

    #[test]
    fn zero_flags_default_to_all_channels() {
        // 0xc0 * 3 = 0x240, low bits zero
        assert_eq!(mix_contrast(0xc0, 0xc0, 0xc0), Srgb::new(0x3f, 0x3f, 0x3f));
    }

    #[test]
    fn flags_select_channels() {
        // sum 0xc2 + 0xc0 + 0xc0 = 0x242 -> flags 2: only green
        assert_eq!(mix_contrast(0xc2, 0xc0, 0xc0), Srgb::new(0xc2, 0x3f, 0xc0));
        // sum 0xc4 + 0xc0 + 0xc0 = 0x244 -> flags 4: only blue
        assert_eq!(mix_contrast(0xc4, 0xc0, 0xc0), Srgb::new(0xc4, 0xc0, 0x3f));
    }

    #[test]
    fn near_white_never_passes_unchanged() {
        for red in 0xc0..=0xffu8 {
            for green in (0xc0..=0xffu8).step_by(7) {
                for blue in (0xc0..=0xffu8).step_by(5) {
                    let mixed = mix_contrast(red, green, blue);
                    assert_ne!(
                        (mixed.red, mixed.green, mixed.blue),
                        (red, green, blue),
                        "({red:#x}, {green:#x}, {blue:#x}) passed through"
                    );
                }
            }
        }
    }

    #[test]
    fn parse_rgb_reads_six_digits() {
        let mut cursor = HashCursor::new("ff8000e");
        assert_eq!(parse_rgb(&mut cursor).unwrap(), Srgb::new(0xff, 0x80, 0x00));
        assert_eq!(cursor.consumed(), 6);
    }
}
