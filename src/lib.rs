//! # dngpatch
//!
//! Bit-exact read/write access to the Color Filter Array (CFA) sensor
//! pixels embedded in TIFF/DNG raw camera files.
//!
//! The crate decodes the TIFF container (header, IFD chain, one level of
//! sub-IFDs), resolves the DNG tags that describe the raw sensor image,
//! and addresses individual packed pixels at any bit depth from 1 to 24
//! plus 32, including depths whose pixels straddle byte boundaries.
//! Typical consumers inspect raw files, patch defective pixels in place,
//! or export the mosaic for further processing.
//!
//! ## Architecture
//!
//! - [`buffer`] - bounds-checked, endian-aware access to the file bytes
//! - [`tiff`] - container structure: header, directories, tag records
//! - [`cfa`] - pixel addressing, bit packing, flat raw frames
//! - [`export`] - PNG dump and preview demosaic collaborators
//! - [`info`] - human- and JSON-readable file summaries
//! - [`config`] - CLI definition for the `dngpatch` binary
//!
//! ## Example
//!
//! ```rust
//! use dngpatch::TiffFile;
//!
//! # fn patch(bytes: Vec<u8>) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
//! let mut file = TiffFile::parse(bytes)?;
//! let index = file.first_cfa_directory().ok_or("no raw data")?;
//! let layout = file.cfa_layout(index)?;
//!
//! // Patch a defective pixel and hand the bytes back for saving.
//! layout.set_pixel(file.buffer_mut(), 3, 1, 1000)?;
//! # Ok(file.into_bytes())
//! # }
//! ```

pub mod buffer;
pub mod cfa;
pub mod config;
pub mod error;
pub mod export;
pub mod info;
pub mod tiff;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export commonly used types
pub use buffer::{ByteAccessor, ByteOrder};
pub use cfa::{CfaColor, CfaLayout, CfaPattern, DataLayout, PixelGrid, RawFrame};
pub use config::{
    Cli, Command, DemosaicArgs, ExportArgs, FillArgs, InfoArgs, PatchArgs, PixelArgs,
};
pub use error::{BufferError, ExportError, PixelError, TiffError};
pub use export::{demosaic_to_png, raw_to_png};
pub use info::{pixel_report, DirectoryInfo, FileInfo};
pub use tiff::{
    Directory, DirectoryEntry, Photometric, Tag, TagType, TiffFile, IFD_ENTRY_SIZE,
    MIN_FILE_SIZE,
};
