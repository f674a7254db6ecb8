//! Pixel read-modify-write for packed CFA data.
//!
//! Two addressing paths:
//!
//! - **Direct** (8/16/32 bpp): the pixel is whole bytes, read and written
//!   through the typed accessors in the file's byte order.
//!
//! - **Bit puzzle** (everything else up to 24 bpp): a pixel's bits may
//!   start mid-byte and cross byte boundaries. The engine reads a 4-byte
//!   window at the pixel's first byte as one big-endian word - big-endian
//!   because TIFF packs bits MSB-first within each byte regardless of the
//!   file's multi-byte order - then shifts and masks the field out, or
//!   splices new bits in and writes the window back. The byte order is an
//!   explicit parameter of that one window read/write, so the accessor's
//!   own state never changes.
//!
//! The 4-byte window is the reason 25-31 bpp is rejected at layout
//! construction: with a 7-bit in-byte shift the field would no longer fit
//! the window. Note the window extends up to 3 bytes past the pixel's
//! first byte, so tightly-sized flat frames need that much slack after
//! the last row (strip-based DNG files always have trailing structure).

use crate::buffer::{ByteAccessor, ByteOrder};
use crate::error::PixelError;

use super::layout::{CfaLayout, DataLayout};
use super::PixelGrid;

impl CfaLayout {
    /// Read the intensity of pixel (x, y).
    pub fn pixel(&self, buf: &ByteAccessor, x: u32, y: u32) -> Result<u32, PixelError> {
        if self.uses_bit_packing() {
            return self.pixel_packed(buf, x, y);
        }
        let ptr = self.pixel_byte_offset(x, y)?;
        Ok(match self.bits_per_pixel() {
            8 => buf.get_u8(ptr)? as u32,
            16 => buf.get_u16(ptr)? as u32,
            // Depth was validated at construction; only 32 remains.
            _ => buf.get_u32(ptr)?,
        })
    }

    /// Write the intensity of pixel (x, y), masked to the bit depth.
    ///
    /// Mutation is in place; all bits outside the pixel's field keep
    /// their previous values.
    pub fn set_pixel(
        &self,
        buf: &mut ByteAccessor,
        x: u32,
        y: u32,
        value: u32,
    ) -> Result<(), PixelError> {
        if self.uses_bit_packing() {
            return self.set_pixel_packed(buf, x, y, value);
        }
        let ptr = self.pixel_byte_offset(x, y)?;
        match self.bits_per_pixel() {
            8 => buf.set_u8(ptr, (value & 0xFF) as u8)?,
            16 => buf.set_u16(ptr, (value & 0xFFFF) as u16)?,
            _ => buf.set_u32(ptr, value)?,
        }
        Ok(())
    }

    /// Position of the pixel's field inside the big-endian window:
    /// (window offset, least-significant bit index, field mask).
    fn field_position(&self, x: u32, y: u32) -> Result<(u64, u32, u32), PixelError> {
        let base = self.pixel_byte_offset(x, y)?;
        let bpp = self.bits_per_pixel();
        // Bit 0 of the first byte is its MSB; bit 31 of the word is the
        // MSB of byte 0, bit 0 the LSB of byte 3.
        let bit_in_byte = ((x as u64 * bpp as u64) % 8) as u32;
        let msb = 31 - bit_in_byte;
        let lsb = msb + 1 - bpp;
        let mask = (1u32 << bpp) - 1;
        Ok((base, lsb, mask))
    }

    /// Bit-puzzle read: extract an arbitrary-width field from the window.
    fn pixel_packed(&self, buf: &ByteAccessor, x: u32, y: u32) -> Result<u32, PixelError> {
        let (base, lsb, mask) = self.field_position(x, y)?;
        let word = buf.get_u32_with(base, ByteOrder::BigEndian)?;
        Ok((word >> lsb) & mask)
    }

    /// Bit-puzzle write: splice an arbitrary-width field into the window.
    fn set_pixel_packed(
        &self,
        buf: &mut ByteAccessor,
        x: u32,
        y: u32,
        value: u32,
    ) -> Result<(), PixelError> {
        let (base, lsb, mask) = self.field_position(x, y)?;
        let word = buf.get_u32_with(base, ByteOrder::BigEndian)?;
        let spliced = (word & !(mask << lsb)) | ((value & mask) << lsb);
        buf.set_u32_with(base, spliced, ByteOrder::BigEndian)?;
        Ok(())
    }

    /// Extract every pixel into a width x height intensity grid.
    ///
    /// This is the bulk artifact consumed by the PNG and demosaic
    /// collaborators. The direct path resolves each row's base offset
    /// once; the packed path goes pixel by pixel.
    pub fn pixel_grid(&self, buf: &ByteAccessor) -> Result<PixelGrid, PixelError> {
        let mut grid = PixelGrid::new(self.width(), self.height());
        if self.uses_bit_packing() {
            for y in 0..self.height() {
                for x in 0..self.width() {
                    grid.set(x, y, self.pixel_packed(buf, x, y)?);
                }
            }
            return Ok(grid);
        }

        let bytes_per_sample = (self.bits_per_pixel() / 8) as u64;
        for y in 0..self.height() {
            let base = self.row_base_offset(y)?;
            for x in 0..self.width() {
                let ptr = base + x as u64 * bytes_per_sample;
                let value = match self.bits_per_pixel() {
                    8 => buf.get_u8(ptr)? as u32,
                    16 => buf.get_u16(ptr)? as u32,
                    _ => buf.get_u32(ptr)?,
                };
                grid.set(x, y, value);
            }
        }
        Ok(grid)
    }

    /// Overwrite every data byte of the layout with 0x00 or 0xFF,
    /// resetting all pixels to fully black or fully white.
    pub fn fill(&self, buf: &mut ByteAccessor, white: bool) -> Result<(), PixelError> {
        let value = if white { 0xFF } else { 0x00 };
        match self.data() {
            DataLayout::Strips {
                offsets,
                byte_counts,
                ..
            } => {
                for (&offset, &count) in offsets.iter().zip(byte_counts) {
                    for i in 0..count {
                        buf.set_u8(offset + i, value)?;
                    }
                }
            }
            DataLayout::Flat { origin } => {
                let total = self.height() as u64 * self.bytes_per_row();
                for i in 0..total {
                    buf.set_u8(origin + i, value)?;
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
