//! Whole-file TIFF/DNG structure: header contract and IFD chain.
//!
//! # Header
//!
//! ```text
//! Bytes 0-1: Byte order (0x4949 = "II" little-endian, 0x4D4D = "MM" big-endian)
//! Bytes 2-3: The number 42, read in the declared order
//! Bytes 4-7: Offset of the first IFD
//! ```
//!
//! Top-level IFDs form a singly-linked list through their next-IFD
//! pointer, terminated by offset 0. Each IFD may declare one level of
//! sub-IFDs through the SubIFDs tag; those are parsed eagerly and placed
//! immediately after their parent in the flat traversal list. Deeper
//! nesting is not searched, matching the DNG layout this tool targets.

use tracing::{debug, warn};

use crate::buffer::{ByteAccessor, ByteOrder};
use crate::cfa::CfaLayout;
use crate::error::TiffError;

use super::directory::Directory;
use super::tags::Tag;

/// Smallest byte count that can hold a header and one empty IFD.
pub const MIN_FILE_SIZE: usize = 20;

/// Little-endian marker bytes "II".
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Big-endian marker bytes "MM".
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// The fixed check value following the byte-order marker.
const TIFF_MARKER: u16 = 42;

/// Safety limit on the directory walk, against cyclic next-IFD chains.
const MAX_DIRECTORIES: usize = 100;

// =============================================================================
// TiffFile
// =============================================================================

/// A parsed TIFF/DNG file: the byte buffer plus the flat directory arena.
///
/// The buffer is owned here and shared by reference with every parse and
/// pixel operation. Directories reference their parent by arena index;
/// the arena order is root-first with sub-IFDs immediately after their
/// parent.
#[derive(Debug, Clone)]
pub struct TiffFile {
    buffer: ByteAccessor,
    directories: Vec<Directory>,
}

impl TiffFile {
    /// Parse a complete TIFF/DNG file image.
    ///
    /// # Errors
    /// - `InvalidHeader` for bad magic bytes, a missing 42 marker, or a
    ///   file below the 20-byte minimum
    /// - any directory-level error from the IFD walk
    pub fn parse(bytes: Vec<u8>) -> Result<Self, TiffError> {
        if bytes.len() < MIN_FILE_SIZE {
            return Err(TiffError::InvalidHeader(format!(
                "file is {} bytes, need at least {}",
                bytes.len(),
                MIN_FILE_SIZE
            )));
        }

        let mut buffer = ByteAccessor::new(bytes);

        // Both marker values read the same under either order.
        let marker = buffer.get_u16(0)?;
        match marker {
            BYTE_ORDER_LITTLE_ENDIAN => buffer.set_byte_order(ByteOrder::LittleEndian),
            BYTE_ORDER_BIG_ENDIAN => buffer.set_byte_order(ByteOrder::BigEndian),
            _ => {
                return Err(TiffError::InvalidHeader(format!(
                    "byte-order marker is 0x{marker:04X}, expected 0x4949 (II) or 0x4D4D (MM)"
                )))
            }
        }

        let check = buffer.get_u16(2)?;
        if check != TIFF_MARKER {
            return Err(TiffError::InvalidHeader(format!(
                "42-marker missing, got {check}"
            )));
        }

        let first_offset = buffer.get_u32(4)? as u64;
        let directories = Self::walk_directories(&buffer, first_offset)?;
        debug!(
            directories = directories.len(),
            byte_order = ?buffer.byte_order(),
            "parsed TIFF structure"
        );

        Ok(Self { buffer, directories })
    }

    /// Follow the next-IFD chain, attaching one level of sub-IFDs right
    /// after each parent.
    fn walk_directories(
        buffer: &ByteAccessor,
        first_offset: u64,
    ) -> Result<Vec<Directory>, TiffError> {
        let mut directories = Vec::new();
        let mut offset = first_offset;

        while offset != 0 {
            if directories.len() >= MAX_DIRECTORIES {
                warn!(limit = MAX_DIRECTORIES, "directory limit reached, stopping walk");
                break;
            }
            let dir = Directory::parse(buffer, offset, None)?;
            offset = dir.next_offset();

            let sub_offsets = if dir.has_sub_directories() {
                dir.sub_ifd_offsets(buffer)?
            } else {
                Vec::new()
            };

            let parent_index = directories.len();
            directories.push(dir);
            for sub_offset in sub_offsets {
                let sub = Directory::parse(buffer, sub_offset, Some(parent_index))?;
                directories.push(sub);
            }
        }

        Ok(directories)
    }

    // -------------------------------------------------------------------------
    // Structure access
    // -------------------------------------------------------------------------

    /// The file's byte order.
    pub fn byte_order(&self) -> ByteOrder {
        self.buffer.byte_order()
    }

    /// All directories in traversal order (sub-IFDs follow their parent).
    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }

    /// A directory by arena index.
    pub fn directory(&self, index: usize) -> Option<&Directory> {
        self.directories.get(index)
    }

    /// Borrow the underlying buffer for value resolution.
    pub fn buffer(&self) -> &ByteAccessor {
        &self.buffer
    }

    /// Borrow the buffer mutably for in-place pixel writes.
    pub fn buffer_mut(&mut self) -> &mut ByteAccessor {
        &mut self.buffer
    }

    /// Borrow the raw file bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Consume the handle and return the (possibly mutated) file bytes
    /// for the caller to persist. The container layout is untouched; only
    /// pixel bytes may differ from the input.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }

    // -------------------------------------------------------------------------
    // CFA access
    // -------------------------------------------------------------------------

    /// Arena index of the first directory holding CFA sensor data.
    pub fn first_cfa_directory(&self) -> Option<usize> {
        self.directories.iter().position(|d| d.is_cfa())
    }

    /// Build the pixel-addressing layout for a directory.
    pub fn cfa_layout(&self, index: usize) -> Result<CfaLayout, TiffError> {
        let dir = self
            .directories
            .get(index)
            .ok_or(TiffError::IndexOutOfRange {
                index: index as u32,
                count: self.directories.len() as u32,
            })?;
        CfaLayout::from_directory(dir, &self.buffer)
    }

    // -------------------------------------------------------------------------
    // Inheritable description strings
    // -------------------------------------------------------------------------

    /// Camera manufacturer for a directory, falling back along the parent
    /// chain, then to an empty string.
    pub fn make(&self, index: usize) -> String {
        self.inherited_string(index, Tag::Make)
    }

    /// Camera model, with parent fallback.
    pub fn model(&self, index: usize) -> String {
        self.inherited_string(index, Tag::Model)
    }

    /// Producing software, with parent fallback.
    pub fn software(&self, index: usize) -> String {
        self.inherited_string(index, Tag::Software)
    }

    /// Creation timestamp, with parent fallback.
    pub fn datetime(&self, index: usize) -> String {
        self.inherited_string(index, Tag::DateTime)
    }

    /// Walk the parent indices until a directory resolves the tag.
    ///
    /// This is the one place where a lookup failure is absorbed instead of
    /// surfaced: descriptive strings degrade to the parent's value or "".
    /// The walk is bounded by the arena (sub-IFDs nest one level).
    fn inherited_string(&self, index: usize, tag: Tag) -> String {
        let mut current = Some(index);
        while let Some(i) = current {
            let Some(dir) = self.directories.get(i) else {
                break;
            };
            if let Some(value) = dir.string_value(&self.buffer, tag) {
                return value;
            }
            current = dir.parent();
        }
        String::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
