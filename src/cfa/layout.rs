//! Pixel geometry and byte/bit addressing.
//!
//! A [`CfaLayout`] captures everything needed to locate a pixel's bits:
//! image dimensions, bit depth, the CFA pattern, and where the pixel data
//! lives. Data placement comes in two shapes:
//!
//! - **Strips** (directory-backed): rows are grouped into strips, each a
//!   contiguous block addressed by the StripOffsets tag.
//! - **Flat**: one contiguous block, as produced by headerless raw frames.
//!
//! Both share the row stride `bytes_per_row = ceil(width x bpp / 8)`:
//! rows are padded up to a byte boundary, so a row never starts mid-byte.
//! Within a row a pixel's first byte is `x * bpp / 8`; for non-byte
//! depths its first bit usually sits mid-byte, which is the bit-puzzle
//! path in [`pixels`](super::pixels).

use crate::buffer::ByteAccessor;
use crate::error::{PixelError, TiffError};
use crate::tiff::{Directory, Tag};

use super::CfaPattern;

/// Whether the addressing engine supports a bit depth.
///
/// 8/16/32 go through direct typed access, everything from 1 to 24 goes
/// through the 4-byte bit-puzzle window. Depths 25-31 would need a field
/// spanning more than 4 bytes once the in-byte shift is added, and wider
/// than 32 cannot be represented at all.
const fn depth_supported(bpp: u32) -> bool {
    (bpp >= 1 && bpp <= 24) || bpp == 32
}

// =============================================================================
// DataLayout
// =============================================================================

/// Placement of the pixel data within the buffer.
#[derive(Debug, Clone)]
pub enum DataLayout {
    /// Rows grouped into strips at explicit byte offsets.
    Strips {
        offsets: Vec<u64>,
        byte_counts: Vec<u64>,
        rows_per_strip: u32,
    },
    /// One contiguous block starting at `origin`.
    Flat { origin: u64 },
}

// =============================================================================
// CfaLayout
// =============================================================================

/// Everything needed to address CFA pixels: geometry, pattern, placement.
///
/// A layout is a self-contained copy of the resolved tag values, so it
/// stays valid while the caller mutates pixel bytes through a separately
/// borrowed [`ByteAccessor`].
#[derive(Debug, Clone)]
pub struct CfaLayout {
    width: u32,
    height: u32,
    bits_per_pixel: u32,
    active_area: [u32; 4],
    crop: [u32; 4],
    pattern: CfaPattern,
    data: DataLayout,
}

impl CfaLayout {
    /// Resolve the layout of a CFA directory.
    ///
    /// Cross-tag validation happens here, once, so the per-pixel hot path
    /// can index strips without re-checking:
    /// - the directory must be CFA and uncompressed
    /// - the bit depth must be addressable
    /// - the strip table must cover every row
    pub fn from_directory(dir: &Directory, buf: &ByteAccessor) -> Result<Self, TiffError> {
        let pattern = dir
            .cfa_pattern()
            .cloned()
            .ok_or_else(|| {
                TiffError::UnsupportedEncoding(
                    "directory does not hold CFA data".to_string(),
                )
            })?;

        // A missing Compression tag means uncompressed per the TIFF default.
        if dir.has_tag(Tag::Compression) && dir.is_compressed(buf)? {
            return Err(TiffError::UnsupportedEncoding(format!(
                "compressed pixel data (compression {})",
                dir.compression(buf)?
            )));
        }

        let width = dir.image_width(buf)?;
        let height = dir.image_height(buf)?;
        let bits_per_pixel = dir.bits_per_pixel()?;
        if !depth_supported(bits_per_pixel) {
            return Err(TiffError::UnsupportedEncoding(format!(
                "{bits_per_pixel} bits per pixel"
            )));
        }

        let offsets = dir.strip_offsets(buf)?;
        let byte_counts = dir.strip_byte_counts(buf)?;
        let rows_per_strip = dir.rows_per_strip(buf)?;
        if rows_per_strip == 0 {
            return Err(TiffError::InconsistentDirectory(
                "RowsPerStrip is zero".to_string(),
            ));
        }
        let strips_needed = height.div_ceil(rows_per_strip) as usize;
        if offsets.len() < strips_needed {
            return Err(TiffError::InconsistentDirectory(format!(
                "{} strip offset(s) for {} row(s) at {} row(s) per strip",
                offsets.len(),
                height,
                rows_per_strip
            )));
        }
        if byte_counts.len() != offsets.len() {
            return Err(TiffError::InconsistentDirectory(format!(
                "{} strip offset(s) but {} byte count(s)",
                offsets.len(),
                byte_counts.len()
            )));
        }

        Ok(Self {
            width,
            height,
            bits_per_pixel,
            active_area: dir.active_area(buf)?,
            crop: dir.crop(buf)?,
            pattern,
            data: DataLayout::Strips {
                offsets,
                byte_counts,
                rows_per_strip,
            },
        })
    }

    /// Layout for a flat frame: contiguous data from offset 0, the full
    /// frame active and uncropped, standard RGGB mosaic.
    pub fn flat(width: u32, height: u32, bits_per_pixel: u32) -> Result<Self, PixelError> {
        Self::flat_with_geometry(
            width,
            height,
            bits_per_pixel,
            [0, 0, width, height],
            [0, 0, width, height],
        )
    }

    /// Flat layout with explicit active-area and crop rectangles.
    pub fn flat_with_geometry(
        width: u32,
        height: u32,
        bits_per_pixel: u32,
        active_area: [u32; 4],
        crop: [u32; 4],
    ) -> Result<Self, PixelError> {
        if !depth_supported(bits_per_pixel) {
            return Err(PixelError::UnsupportedBitDepth(bits_per_pixel));
        }
        Ok(Self {
            width,
            height,
            bits_per_pixel,
            active_area,
            crop,
            pattern: CfaPattern::rggb(),
            data: DataLayout::Flat { origin: 0 },
        })
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed bit width of one pixel sample.
    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }

    /// Active sensor rectangle as (x0, y0, x1, y1).
    pub fn active_area(&self) -> [u32; 4] {
        self.active_area
    }

    /// Default crop window as (x, y, width, height).
    pub fn crop(&self) -> [u32; 4] {
        self.crop
    }

    /// The repeating color mosaic.
    pub fn pattern(&self) -> &CfaPattern {
        &self.pattern
    }

    /// The data placement.
    pub fn data(&self) -> &DataLayout {
        &self.data
    }

    /// Color recorded by the photosite at (x, y). The pattern repeats
    /// indefinitely, so this never fails.
    pub fn color_at(&self, x: u32, y: u32) -> super::CfaColor {
        self.pattern.color_at(x, y)
    }

    // -------------------------------------------------------------------------
    // Addressing
    // -------------------------------------------------------------------------

    /// Row stride in bytes, rounded up to a whole byte.
    pub fn bytes_per_row(&self) -> u64 {
        (self.width as u64 * self.bits_per_pixel as u64 + 7) / 8
    }

    /// Whether pixels need the bit-puzzle path (depth not directly
    /// addressable as 1, 2 or 4 whole bytes).
    pub fn uses_bit_packing(&self) -> bool {
        self.bits_per_pixel % 8 != 0 || self.bits_per_pixel == 24
    }

    /// Fail unless (x, y) is inside the image rectangle.
    pub(super) fn check_bounds(&self, x: u32, y: u32) -> Result<(), PixelError> {
        if x >= self.width || y >= self.height {
            return Err(PixelError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Buffer offset of the first byte of row `y`.
    pub fn row_base_offset(&self, y: u32) -> Result<u64, PixelError> {
        self.check_bounds(0, y)?;
        match &self.data {
            DataLayout::Strips {
                offsets,
                rows_per_strip,
                ..
            } => {
                let strip = (y / rows_per_strip) as usize;
                let row_in_strip = (y % rows_per_strip) as u64;
                // Construction guarantees the strip exists for in-bounds rows.
                let base = offsets.get(strip).copied().ok_or(
                    PixelError::PixelOutOfBounds {
                        x: 0,
                        y,
                        width: self.width,
                        height: self.height,
                    },
                )?;
                Ok(base + row_in_strip * self.bytes_per_row())
            }
            DataLayout::Flat { origin } => Ok(origin + y as u64 * self.bytes_per_row()),
        }
    }

    /// Buffer offset of the first byte containing bits of pixel (x, y).
    pub fn pixel_byte_offset(&self, x: u32, y: u32) -> Result<u64, PixelError> {
        self.check_bounds(x, y)?;
        let base = self.row_base_offset(y)?;
        Ok(base + x as u64 * self.bits_per_pixel as u64 / 8)
    }
}

// =============================================================================
// Tests
// =============================================================================
