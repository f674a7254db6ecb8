//! Bounds-checked, endian-aware access to an in-memory file image.
//!
//! A DNG file is loaded into memory once and then read and mutated in place
//! through a [`ByteAccessor`]. The accessor owns the bytes and knows the
//! file's byte order, so every multi-byte read or write is assembled
//! byte-by-byte in the right sequence and validated against the buffer
//! length first.
//!
//! # Byte order
//!
//! TIFF files declare their endianness in the first two bytes of the header
//! (II = little-endian, MM = big-endian). The accessor defaults to
//! little-endian; [`ByteAccessor::set_byte_order`] switches it once the
//! header has been decoded.
//!
//! The bit-packing engine needs one deliberately order-independent
//! operation: reading or writing a 4-byte window exactly as it is laid out
//! in the file. For that, [`ByteAccessor::get_u32_with`] and
//! [`ByteAccessor::set_u32_with`] take the byte order as an explicit
//! parameter instead of toggling the instance state, so shared readers
//! never observe a transient order change.

use crate::error::BufferError;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) for multi-byte values in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel): lowest offset holds the least
    /// significant byte. The default.
    #[default]
    LittleEndian,
    /// Big-endian ("MM" = Motorola): lowest offset holds the most
    /// significant byte.
    BigEndian,
}

// =============================================================================
// ByteAccessor
// =============================================================================

/// An owned, mutable byte buffer with bounds-checked typed access.
///
/// All getters and setters validate `offset + width <= len` and fail with
/// [`BufferError::OutOfBounds`] otherwise; nothing is ever read or written
/// past the end. Mutation happens in place, the buffer is never
/// reallocated.
#[derive(Debug, Clone)]
pub struct ByteAccessor {
    data: Vec<u8>,
    byte_order: ByteOrder,
}

impl ByteAccessor {
    /// Wrap a byte buffer, assuming little-endian data.
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            data,
            byte_order: ByteOrder::LittleEndian,
        }
    }

    /// Wrap a byte buffer with a known byte order.
    pub fn with_byte_order(data: Vec<u8>, byte_order: ByteOrder) -> Self {
        Self { data, byte_order }
    }

    /// Number of bytes in the buffer.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Current byte order for multi-byte access.
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Switch the byte order for subsequent multi-byte access.
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    /// Borrow the raw bytes in file order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume the accessor and hand the bytes back, e.g. for writing the
    /// file out. The core never opens file handles itself.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Validate that `need` bytes starting at `offset` are inside the
    /// buffer and return `offset` as a usable index.
    fn check(&self, offset: u64, need: u64) -> Result<usize, BufferError> {
        let len = self.data.len() as u64;
        match offset.checked_add(need) {
            Some(end) if end <= len => Ok(offset as usize),
            _ => Err(BufferError::OutOfBounds { offset, need, len }),
        }
    }

    // -------------------------------------------------------------------------
    // 8-bit access
    // -------------------------------------------------------------------------

    /// Read an unsigned byte.
    pub fn get_u8(&self, offset: u64) -> Result<u8, BufferError> {
        let i = self.check(offset, 1)?;
        Ok(self.data[i])
    }

    /// Read a signed byte (two's complement reinterpretation).
    pub fn get_i8(&self, offset: u64) -> Result<i8, BufferError> {
        Ok(self.get_u8(offset)? as i8)
    }

    /// Write an unsigned byte.
    pub fn set_u8(&mut self, offset: u64, value: u8) -> Result<(), BufferError> {
        let i = self.check(offset, 1)?;
        self.data[i] = value;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // 16-bit access
    // -------------------------------------------------------------------------

    /// Read an unsigned 16-bit value using the current byte order.
    pub fn get_u16(&self, offset: u64) -> Result<u16, BufferError> {
        let i = self.check(offset, 2)?;
        let raw = [self.data[i], self.data[i + 1]];
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => u16::from_le_bytes(raw),
            ByteOrder::BigEndian => u16::from_be_bytes(raw),
        })
    }

    /// Read a signed 16-bit value (two's complement reinterpretation).
    pub fn get_i16(&self, offset: u64) -> Result<i16, BufferError> {
        Ok(self.get_u16(offset)? as i16)
    }

    /// Write an unsigned 16-bit value using the current byte order.
    pub fn set_u16(&mut self, offset: u64, value: u16) -> Result<(), BufferError> {
        let i = self.check(offset, 2)?;
        let raw = match self.byte_order {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        self.data[i..i + 2].copy_from_slice(&raw);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // 32-bit access
    // -------------------------------------------------------------------------

    /// Read an unsigned 32-bit value using the current byte order.
    pub fn get_u32(&self, offset: u64) -> Result<u32, BufferError> {
        self.get_u32_with(offset, self.byte_order)
    }

    /// Read a signed 32-bit value (two's complement reinterpretation).
    pub fn get_i32(&self, offset: u64) -> Result<i32, BufferError> {
        Ok(self.get_u32(offset)? as i32)
    }

    /// Write an unsigned 32-bit value using the current byte order.
    pub fn set_u32(&mut self, offset: u64, value: u32) -> Result<(), BufferError> {
        self.set_u32_with(offset, value, self.byte_order)
    }

    /// Read an unsigned 32-bit value with an explicit byte order.
    ///
    /// The bit-packing engine reads its 4-byte pixel window big-endian no
    /// matter what order the file uses; passing the order here keeps the
    /// instance state untouched.
    pub fn get_u32_with(&self, offset: u64, byte_order: ByteOrder) -> Result<u32, BufferError> {
        let i = self.check(offset, 4)?;
        let raw = [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ];
        Ok(match byte_order {
            ByteOrder::LittleEndian => u32::from_le_bytes(raw),
            ByteOrder::BigEndian => u32::from_be_bytes(raw),
        })
    }

    /// Write an unsigned 32-bit value with an explicit byte order.
    pub fn set_u32_with(
        &mut self,
        offset: u64,
        value: u32,
        byte_order: ByteOrder,
    ) -> Result<(), BufferError> {
        let i = self.check(offset, 4)?;
        let raw = match byte_order {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        self.data[i..i + 4].copy_from_slice(&raw);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Slice access
    // -------------------------------------------------------------------------

    /// Copy `count` bytes starting at `offset`, reversed when the byte
    /// order is big-endian so the result is always least-significant-first.
    pub fn get_slice(&self, offset: u64, count: usize) -> Result<Vec<u8>, BufferError> {
        let i = self.check(offset, count as u64)?;
        let mut out = self.data[i..i + count].to_vec();
        if self.byte_order == ByteOrder::BigEndian {
            out.reverse();
        }
        Ok(out)
    }

    /// Write a least-significant-first byte slice, reversing it when the
    /// byte order is big-endian.
    pub fn set_slice(&mut self, offset: u64, bytes: &[u8]) -> Result<(), BufferError> {
        let i = self.check(offset, bytes.len() as u64)?;
        match self.byte_order {
            ByteOrder::LittleEndian => self.data[i..i + bytes.len()].copy_from_slice(bytes),
            ByteOrder::BigEndian => {
                for (n, &b) in bytes.iter().enumerate() {
                    self.data[i + bytes.len() - n - 1] = b;
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
