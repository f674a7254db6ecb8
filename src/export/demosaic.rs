//! Primitive bilinear demosaic for preview purposes.
//!
//! Each missing color at a photosite is the average of its nearest
//! same-color neighbors: the 4-neighborhood for green, the diagonals for
//! the opposite color, and the row direction decides which neighbor pair
//! is red vs blue at a green site. Output is normalized per channel to 8
//! bits through empirically chosen white-balance factors.
//!
//! This is a preview algorithm. The factors below were tuned by eye on a
//! handful of test shots; a real raw converter does considerably more.

use std::io::Cursor;

use image::{ImageFormat, RgbImage};

use crate::cfa::{CfaColor, CfaLayout, PixelGrid};
use crate::error::ExportError;

/// Per-channel white-balance factors applied to the channel maxima
/// before normalization. Empirically established.
const RED_SCALE: f64 = 0.75 * 0.5;
const GREEN_SCALE: f64 = 1.15 * 0.5;
const BLUE_SCALE: f64 = 1.1 * 0.5;

/// Demosaic the CFA grid and encode the result as PNG bytes.
pub fn demosaic_to_png(grid: &PixelGrid, layout: &CfaLayout) -> Result<Vec<u8>, ExportError> {
    let w = grid.width();
    let h = grid.height();

    let mut planes = vec![[0.0f64; 3]; w as usize * h as usize];
    let mut max_r = 0.0f64;
    let mut max_g = 0.0f64;
    let mut max_b = 0.0f64;

    for y in 0..h {
        for x in 0..w {
            let own = grid.get(x, y) as f64;
            let (r, g, b) = match layout.color_at(x, y) {
                CfaColor::Red => {
                    let g = cross_mean(grid, x, y);
                    let b = diagonal_mean(grid, x, y);
                    (own, g, b)
                }
                CfaColor::Green => {
                    let horizontal = row_mean(grid, x, y);
                    let vertical = column_mean(grid, x, y);
                    // In even rows of an RGGB mosaic the horizontal
                    // neighbors of a green site are red, in odd rows blue.
                    if y % 2 == 0 {
                        (horizontal, own, vertical)
                    } else {
                        (vertical, own, horizontal)
                    }
                }
                CfaColor::Blue => {
                    let g = cross_mean(grid, x, y);
                    let r = diagonal_mean(grid, x, y);
                    (r, g, own)
                }
            };

            planes[(y * w + x) as usize] = [r, g, b];
            max_r = max_r.max(r);
            max_g = max_g.max(g);
            max_b = max_b.max(b);
        }
    }

    max_r *= RED_SCALE;
    max_g *= GREEN_SCALE;
    max_b *= BLUE_SCALE;

    let mut img = RgbImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let [r, g, b] = planes[(y * w + x) as usize];
            img.put_pixel(
                x,
                y,
                image::Rgb([
                    normalize(r, max_r),
                    normalize(g, max_g),
                    normalize(b, max_b),
                ]),
            );
        }
    }

    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

/// Scale to 8 bits against a channel maximum, clamped to 255.
fn normalize(value: f64, channel_max: f64) -> u8 {
    if channel_max <= 0.0 {
        return 0;
    }
    (value / channel_max * 255.0).min(255.0) as u8
}

/// Mean of the in-bounds neighbors at the given offsets.
fn offset_mean(grid: &PixelGrid, x: u32, y: u32, offsets: &[(i64, i64)]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0.0;
    for &(dx, dy) in offsets {
        let nx = x as i64 + dx;
        let ny = y as i64 + dy;
        if nx >= 0 && ny >= 0 && (nx as u32) < grid.width() && (ny as u32) < grid.height() {
            sum += grid.get(nx as u32, ny as u32) as f64;
            count += 1.0;
        }
    }
    if count == 0.0 {
        0.0
    } else {
        sum / count
    }
}

/// Mean of left/right/above/below.
fn cross_mean(grid: &PixelGrid, x: u32, y: u32) -> f64 {
    offset_mean(grid, x, y, &[(-1, 0), (1, 0), (0, -1), (0, 1)])
}

/// Mean of the four diagonal neighbors.
fn diagonal_mean(grid: &PixelGrid, x: u32, y: u32) -> f64 {
    offset_mean(grid, x, y, &[(-1, -1), (1, -1), (-1, 1), (1, 1)])
}

/// Mean of left/right.
fn row_mean(grid: &PixelGrid, x: u32, y: u32) -> f64 {
    offset_mean(grid, x, y, &[(-1, 0), (1, 0)])
}

/// Mean of above/below.
fn column_mean(grid: &PixelGrid, x: u32, y: u32) -> f64 {
    offset_mean(grid, x, y, &[(0, -1), (0, 1)])
}

// =============================================================================
// Tests
// =============================================================================
