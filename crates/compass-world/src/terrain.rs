//! Land-mask construction from grayscale terrain images.
//!
//! A terrain image is 256x256 8-bit grayscale, one pixel per global cell
//! in row-major order. Dark pixels (`<= 128`) are land and bright pixels
//! are water. Two on-disk encodings are accepted:
//!
//! - a raw dump of exactly 65536 pixel bytes,
//! - a binary PGM (`P5`) with width and height 256 and maxval 255.
//!
//! A file of exactly 65536 bytes is always read as a raw dump.

use std::path::Path;

use compass_types::{GLOBAL_COUNT, GLOBAL_SIZE, Terrain};
use tracing::{debug, info};

use crate::error::WorldError;

/// Convert grayscale pixels into land-mask bytes.
///
/// # Errors
///
/// Returns [`WorldError::MaskLength`] if `pixels` is not one byte per
/// global cell.
pub fn land_mask_from_pixels(pixels: &[u8]) -> Result<Vec<u8>, WorldError> {
    if pixels.len() != GLOBAL_COUNT {
        return Err(WorldError::MaskLength {
            mask: "terrain",
            expected: GLOBAL_COUNT,
            actual: pixels.len(),
        });
    }
    Ok(pixels
        .iter()
        .map(|&pixel| Terrain::from_pixel(pixel).mask_byte())
        .collect())
}

/// Read a terrain image from disk and convert it into a land mask.
///
/// # Errors
///
/// Returns [`WorldError::Io`] if the file cannot be read,
/// [`WorldError::TerrainFormat`] for a malformed PGM header, and
/// [`WorldError::MaskLength`] when the pixel data has the wrong size.
pub fn load_land_mask(path: &Path) -> Result<Vec<u8>, WorldError> {
    let bytes = std::fs::read(path).map_err(|source| WorldError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // A raw dump is exactly one byte per cell, even if it happens to
    // start with the PGM magic.
    let pixels = if bytes.len() != GLOBAL_COUNT && bytes.starts_with(b"P5") {
        debug!(path = %path.display(), "Decoding PGM terrain image");
        pgm_pixels(&bytes)?
    } else {
        bytes.as_slice()
    };

    let mask = land_mask_from_pixels(pixels)?;
    let land = mask.iter().filter(|&&b| b != 0).count();
    info!(path = %path.display(), land_cells = land, "Loaded terrain mask");
    Ok(mask)
}

/// Parse a binary PGM header and return the pixel payload.
fn pgm_pixels(bytes: &[u8]) -> Result<&[u8], WorldError> {
    let mut cursor = PgmCursor { bytes, pos: 2 };
    let width = cursor.number()?;
    let height = cursor.number()?;
    let maxval = cursor.number()?;

    let size = u32::from(GLOBAL_SIZE);
    if width != size || height != size {
        return Err(format_error(format!("expected {size}x{size} pixels, found {width}x{height}")));
    }
    if maxval != 255 {
        return Err(format_error(format!("expected maxval 255, found {maxval}")));
    }

    // Exactly one whitespace byte separates the header from the raster.
    let start = cursor.pos.saturating_add(1);
    bytes
        .get(start..)
        .ok_or_else(|| format_error("missing pixel data".to_owned()))
}

const fn format_error(reason: String) -> WorldError {
    WorldError::TerrainFormat { reason }
}

/// Minimal reader over the ASCII part of a PGM header.
struct PgmCursor<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl PgmCursor<'_> {
    /// Skip whitespace and `#` comments, then read one decimal number.
    fn number(&mut self) -> Result<u32, WorldError> {
        self.skip_blank();
        let mut value: u32 = 0;
        let mut digits = 0_usize;
        while let Some(&byte) = self.bytes.get(self.pos) {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(byte.wrapping_sub(b'0'))))
                .ok_or_else(|| format_error("header number overflows".to_owned()))?;
            digits = digits.saturating_add(1);
            self.pos = self.pos.saturating_add(1);
        }
        if digits == 0 {
            return Err(format_error("truncated PGM header".to_owned()));
        }
        Ok(value)
    }

    fn skip_blank(&mut self) {
        while let Some(&byte) = self.bytes.get(self.pos) {
            if byte == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    if c == b'\n' {
                        break;
                    }
                    self.pos = self.pos.saturating_add(1);
                }
            } else if byte.is_ascii_whitespace() {
                self.pos = self.pos.saturating_add(1);
            } else {
                break;
            }
        }
    }
}
