//! A headerless flat CFA frame.
//!
//! Raw video formats (and intermediate processing steps) hand around bare
//! sensor frames with no TIFF container: just packed pixel data plus
//! out-of-band geometry. [`RawFrame`] owns such a buffer together with its
//! [`CfaLayout`], giving it the same pixel surface as a directory-backed
//! image. The pattern is the fixed 2x2 RGGB mosaic those formats use.
//!
//! Cloning a frame deep-copies the buffer. That is the intended way to
//! get atomicity across several pixel edits: clone, edit the clone, and
//! swap it in only once every edit has succeeded.

use crate::buffer::ByteAccessor;
use crate::error::{BufferError, PixelError};

use super::layout::CfaLayout;
use super::{CfaColor, PixelGrid};

// =============================================================================
// RawFrame
// =============================================================================

/// A flat CFA frame owning its pixel buffer.
#[derive(Debug, Clone)]
pub struct RawFrame {
    buffer: ByteAccessor,
    layout: CfaLayout,
}

impl RawFrame {
    /// Wrap packed frame data, with the active area and crop covering the
    /// whole frame.
    ///
    /// # Errors
    /// - `UnsupportedBitDepth` for depths outside 1-24 and 32
    /// - `Buffer` if the data is shorter than `height x bytes_per_row`
    pub fn new(data: Vec<u8>, width: u32, height: u32, bits_per_pixel: u32) -> Result<Self, PixelError> {
        let layout = CfaLayout::flat(width, height, bits_per_pixel)?;
        Self::with_layout(data, layout)
    }

    /// Wrap packed frame data with explicit active-area and crop
    /// rectangles (both as stored in the originating DNG).
    pub fn with_geometry(
        data: Vec<u8>,
        width: u32,
        height: u32,
        bits_per_pixel: u32,
        active_area: [u32; 4],
        crop: [u32; 4],
    ) -> Result<Self, PixelError> {
        let layout =
            CfaLayout::flat_with_geometry(width, height, bits_per_pixel, active_area, crop)?;
        Self::with_layout(data, layout)
    }

    fn with_layout(data: Vec<u8>, layout: CfaLayout) -> Result<Self, PixelError> {
        let need = layout.height() as u64 * layout.bytes_per_row();
        if (data.len() as u64) < need {
            return Err(PixelError::Buffer(BufferError::OutOfBounds {
                offset: 0,
                need,
                len: data.len() as u64,
            }));
        }
        Ok(Self {
            buffer: ByteAccessor::new(data),
            layout,
        })
    }

    /// The frame's pixel-addressing layout.
    pub fn layout(&self) -> &CfaLayout {
        &self.layout
    }

    /// Frame width in pixels.
    pub fn width(&self) -> u32 {
        self.layout.width()
    }

    /// Frame height in pixels.
    pub fn height(&self) -> u32 {
        self.layout.height()
    }

    /// Packed bit width of one pixel.
    pub fn bits_per_pixel(&self) -> u32 {
        self.layout.bits_per_pixel()
    }

    /// Read the intensity of pixel (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Result<u32, PixelError> {
        self.layout.pixel(&self.buffer, x, y)
    }

    /// Write the intensity of pixel (x, y), masked to the bit depth.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> Result<(), PixelError> {
        self.layout.set_pixel(&mut self.buffer, x, y, value)
    }

    /// Extract the whole frame into an intensity grid.
    pub fn pixel_grid(&self) -> Result<PixelGrid, PixelError> {
        self.layout.pixel_grid(&self.buffer)
    }

    /// Color recorded at (x, y) under the RGGB mosaic.
    pub fn color_at(&self, x: u32, y: u32) -> CfaColor {
        self.layout.color_at(x, y)
    }

    /// Borrow the raw frame bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Hand the frame data back, e.g. for writing it into a file.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }
}

// =============================================================================
// Tests
// =============================================================================
