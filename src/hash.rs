//! Left-to-right hex digit reader for identicon hashes.

use crate::error::{IdenticonError, Result};

/// Checks that `hash` supplies at least `required` hex digits.
///
/// Only the first `required` characters are inspected; anything after them
/// is never consumed by the decoder and is ignored.
pub fn validate_hash(hash: &str, required: usize) -> Result<()> {
    let actual = hash.chars().count();
    if actual < required {
        return Err(IdenticonError::InsufficientHashLength { required, actual });
    }
    if let Some((position, found)) = hash
        .chars()
        .take(required)
        .enumerate()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        return Err(IdenticonError::InvalidHashDigit { position, found });
    }
    Ok(())
}

/// Cursor over the hex digits of a hash.
///
/// Every read advances the cursor; digits are never reused.
#[derive(Debug, Clone)]
pub struct HashCursor<'a> {
    digits: &'a [u8],
    position: usize,
}

impl<'a> HashCursor<'a> {
    /// Creates a cursor positioned at the first digit of `hash`.
    pub fn new(hash: &'a str) -> Self {
        Self {
            digits: hash.as_bytes(),
            position: 0,
        }
    }

    /// Reads one hex digit (4 bits).
    pub fn nibble(&mut self) -> Result<u8> {
        let position = self.position;
        let Some(&byte) = self.digits.get(position) else {
            return Err(IdenticonError::InsufficientHashLength {
                required: position + 1,
                actual: self.digits.len(),
            });
        };
        let value = (byte as char)
            .to_digit(16)
            .ok_or(IdenticonError::InvalidHashDigit {
                position,
                found: byte as char,
            })?;
        self.position += 1;
        Ok(value as u8)
    }

    /// Reads two hex digits as one byte, high nibble first.
    pub fn byte(&mut self) -> Result<u8> {
        let high = self.nibble()?;
        let low = self.nibble()?;
        Ok((high << 4) | low)
    }

    /// Number of digits consumed so far.
    pub fn consumed(&self) -> usize {
        self.position
    }
}
