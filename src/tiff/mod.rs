//! TIFF container decoding for DNG files.
//!
//! # Key Concepts
//!
//! - **Byte order**: the header declares the file's endianness (II =
//!   little-endian, MM = big-endian); every multi-byte value respects it.
//!
//! - **IFD (Image File Directory)**: entry count, fixed 12-byte tag
//!   records, pointer to the next IFD. DNG files chain several IFDs and
//!   hang the raw sensor image off a sub-IFD of the first one.
//!
//! - **In-entry vs external values**: values of at most 4 bytes live
//!   inside the tag record; larger value sets live elsewhere in the file,
//!   addressed by a 4-byte offset in the record.
//!
//! Only the classic 32-bit TIFF container is supported; DNG does not use
//! BigTIFF. Compressed pixel data is detected but cannot be addressed.

mod directory;
mod entry;
mod file;
mod tags;

pub use directory::Directory;
pub use entry::{DirectoryEntry, IFD_ENTRY_SIZE};
pub use file::{TiffFile, MIN_FILE_SIZE};
pub use tags::{Photometric, Tag, TagType, PLANAR_CHUNKY, RES_UNIT_NONE};
