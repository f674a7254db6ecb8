//! Human- and machine-readable file inspection.
//!
//! Builds a serializable summary of every directory in a parsed file,
//! absorbing per-field failures into `None`: inspection is for looking at
//! possibly broken files, so one malformed tag should not hide the rest
//! of the dump. Editing paths use the strict accessors instead.

use std::fmt;

use serde::Serialize;

use crate::buffer::{ByteAccessor, ByteOrder};
use crate::cfa::CfaLayout;
use crate::error::PixelError;
use crate::tiff::{Photometric, TiffFile};

// =============================================================================
// FileInfo
// =============================================================================

/// Summary of a parsed TIFF/DNG file.
#[derive(Debug, Serialize)]
pub struct FileInfo {
    pub byte_order: &'static str,
    pub directories: Vec<DirectoryInfo>,
}

/// Summary of one IFD.
#[derive(Debug, Serialize)]
pub struct DirectoryInfo {
    pub index: usize,
    pub offset: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
    pub entry_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photometric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compression: Option<u16>,
    pub bits_per_sample: Vec<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strips: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_per_strip: Option<u32>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub make: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub model: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub software: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub datetime: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfa_pattern_dim: Option<[u32; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfa_pattern: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_area: Option<[u32; 4]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<[u32; 4]>,
}

impl FileInfo {
    /// Summarize every directory of a parsed file.
    pub fn from_file(file: &TiffFile) -> Self {
        let byte_order = match file.byte_order() {
            ByteOrder::LittleEndian => "little-endian",
            ByteOrder::BigEndian => "big-endian",
        };
        let directories = file
            .directories()
            .iter()
            .enumerate()
            .map(|(index, dir)| {
                let buf = file.buffer();
                let photometric = dir.photometric().map(|v| match Photometric::from_u16(v) {
                    Some(p) => p.name().to_string(),
                    None => v.to_string(),
                });
                let (cfa_pattern_dim, cfa_pattern) = match dir.cfa_pattern() {
                    Some(p) => {
                        let (cols, rows) = p.dims();
                        let names = p.colors().iter().map(|c| c.name()).collect();
                        (Some([cols, rows]), Some(names))
                    }
                    None => (None, None),
                };
                DirectoryInfo {
                    index,
                    offset: dir.offset(),
                    parent: dir.parent(),
                    entry_count: dir.entry_count(),
                    width: dir.image_width(buf).ok(),
                    height: dir.image_height(buf).ok(),
                    photometric,
                    compression: dir.compression(buf).ok(),
                    bits_per_sample: dir.bits_per_sample().to_vec(),
                    strips: dir.strips_per_image().ok(),
                    rows_per_strip: dir.rows_per_strip(buf).ok(),
                    make: file.make(index),
                    model: file.model(index),
                    software: file.software(index),
                    datetime: file.datetime(index),
                    cfa_pattern_dim,
                    cfa_pattern,
                    active_area: dir.active_area(buf).ok(),
                    crop: dir.crop(buf).ok(),
                }
            })
            .collect();
        Self {
            byte_order,
            directories,
        }
    }
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Byte order: {}", self.byte_order)?;
        for dir in &self.directories {
            write!(f, "{dir}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DirectoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Directory {} at offset {} ({} entries",
            self.index, self.offset, self.entry_count
        )?;
        if let Some(parent) = self.parent {
            write!(f, ", sub-IFD of {parent}")?;
        }
        writeln!(f, ")")?;

        if let (Some(w), Some(h)) = (self.width, self.height) {
            writeln!(f, "  Image size: {w} x {h}")?;
        }
        if let Some(ref p) = self.photometric {
            writeln!(f, "  Photometric interpretation: {p}")?;
        }
        if let Some(c) = self.compression {
            writeln!(f, "  Compression: {c}")?;
        }
        if !self.bits_per_sample.is_empty() {
            writeln!(f, "  Bits per sample: {}", join(&self.bits_per_sample))?;
        }
        if let (Some(strips), Some(rows)) = (self.strips, self.rows_per_strip) {
            writeln!(f, "  Strips: {strips} ({rows} rows per strip)")?;
        }
        if !self.make.is_empty() {
            writeln!(f, "  Make: {}", self.make)?;
        }
        if !self.model.is_empty() {
            writeln!(f, "  Model: {}", self.model)?;
        }
        if !self.software.is_empty() {
            writeln!(f, "  Software: {}", self.software)?;
        }
        if !self.datetime.is_empty() {
            writeln!(f, "  Date and time: {}", self.datetime)?;
        }
        if let Some([cols, rows]) = self.cfa_pattern_dim {
            writeln!(f, "  CFA pattern: {cols} x {rows}")?;
        }
        if let Some(ref pattern) = self.cfa_pattern {
            writeln!(f, "  CFA colors: {}", pattern.join(", "))?;
        }
        if let Some([x0, y0, x1, y1]) = self.active_area {
            writeln!(f, "  Active area: ({x0}, {y0}) - ({x1}, {y1})")?;
        }
        if let Some([x, y, w, h]) = self.crop {
            writeln!(f, "  Default crop: {w} x {h} at ({x}, {y})")?;
        }
        Ok(())
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// =============================================================================
// Pixel report
// =============================================================================

/// Describe one pixel: its color, its value, and the 5x5 neighborhood of
/// same-color photosites around it (stepping by 2 in each direction).
/// Neighbors outside the image print as "-".
pub fn pixel_report(
    layout: &CfaLayout,
    buf: &ByteAccessor,
    x: u32,
    y: u32,
) -> Result<String, PixelError> {
    let value = layout.pixel(buf, x, y)?;
    let color = layout.color_at(x, y);

    let mut out = format!(
        "Pixel at ({x}, {y}) is {}: {value}\n\nSurrounding pixels of the same color:\n",
        color.name()
    );
    for dy in (-4i64..=4).step_by(2) {
        for dx in (-4i64..=4).step_by(2) {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            let cell = if nx >= 0
                && ny >= 0
                && (nx as u32) < layout.width()
                && (ny as u32) < layout.height()
            {
                layout.pixel(buf, nx as u32, ny as u32)?.to_string()
            } else {
                "-".to_string()
            };
            out.push_str(&format!("{cell:>8}"));
        }
        out.push('\n');
    }
    Ok(out)
}

// =============================================================================
// Tests
// =============================================================================
