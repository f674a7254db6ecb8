use thiserror::Error;

use crate::tiff::TagType;

/// Errors raised by the bounds-checked byte accessor
#[derive(Debug, Clone, Error)]
pub enum BufferError {
    /// Requested range exceeds the buffer
    #[error("Out of bounds: requested {need} bytes at offset {offset}, buffer is {len} bytes")]
    OutOfBounds { offset: u64, need: u64, len: u64 },
}

/// Errors that can occur when parsing the TIFF container structure
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// Buffer-level range violation while decoding the container
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// Bad magic bytes, missing 42 marker, or file below the minimum size
    #[error("Invalid TIFF header: {0}")]
    InvalidHeader(String),

    /// Unrecognized TIFF type code in an IFD entry (valid codes are 1-12)
    #[error("Unknown tag type code {0}")]
    UnknownTagType(u16),

    /// Required tag is absent and no fallback applies
    #[error("Missing required tag: {0}")]
    MissingTag(&'static str),

    /// A value was requested in a representation its type does not support
    #[error("Type mismatch: expected {expected}, entry holds {actual:?}")]
    TypeMismatch {
        expected: &'static str,
        actual: TagType,
    },

    /// Array index at or beyond the entry's declared value count
    #[error("Index {index} out of range for entry with {count} value(s)")]
    IndexOutOfRange { index: u32, count: u32 },

    /// Cross-tag validation failure within one directory
    #[error("Inconsistent directory: {0}")]
    InconsistentDirectory(String),

    /// A storage encoding the decoder deliberately does not support
    #[error("Unsupported encoding: {0}")]
    UnsupportedEncoding(String),
}

/// Errors that can occur while addressing or mutating CFA pixels
#[derive(Debug, Clone, Error)]
pub enum PixelError {
    /// Buffer-level range violation while touching pixel bytes
    #[error("Buffer error: {0}")]
    Buffer(#[from] BufferError),

    /// Coordinate outside the image rectangle
    #[error("Pixel ({x}, {y}) outside image bounds {width}x{height}")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Bit depth the addressing engine cannot represent (valid: 1-24 and 32)
    #[error("Unsupported bit depth: {0} bits per pixel")]
    UnsupportedBitDepth(u32),
}

/// Errors from the PNG export and demosaic collaborators
#[derive(Debug, Error)]
pub enum ExportError {
    /// Pixel extraction failed
    #[error("Pixel error: {0}")]
    Pixel(#[from] PixelError),

    /// PNG encoding failed
    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),
}
