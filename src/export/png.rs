//! Raw CFA mosaic to PNG, without demosaicing.
//!
//! Every pixel keeps its single recorded intensity. Depths above 8 bits
//! are scaled down by a right shift. The mosaic can be rendered either as
//! grayscale (R = G = B) or "colorized", with each intensity placed in
//! its CFA color channel, which makes the mosaic pattern visible.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use crate::cfa::{CfaColor, CfaLayout, PixelGrid};
use crate::error::ExportError;

/// Encode the raw mosaic as PNG bytes.
///
/// The caller supplies the grid extracted from the layout; the layout is
/// consulted for the bit depth and the per-pixel color.
pub fn raw_to_png(
    grid: &PixelGrid,
    layout: &CfaLayout,
    grayscale: bool,
) -> Result<Vec<u8>, ExportError> {
    let shift = layout.bits_per_pixel().saturating_sub(8);
    let mut img = RgbImage::new(grid.width(), grid.height());

    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let v = (grid.get(x, y) >> shift).min(255) as u8;
            let rgb = if grayscale {
                [v, v, v]
            } else {
                match layout.color_at(x, y) {
                    CfaColor::Red => [v, 0, 0],
                    CfaColor::Green => [0, v, 0],
                    CfaColor::Blue => [0, 0, v],
                }
            };
            img.put_pixel(x, y, image::Rgb(rgb));
        }
    }

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================
