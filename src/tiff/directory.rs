//! Image File Directory parsing and tag access.
//!
//! An IFD is `2 + 12 x entry-count + 4` bytes: a 2-byte entry count, the
//! fixed-size tag records, and a 4-byte pointer to the next IFD (0 marks
//! the end of the chain).
//!
//! Beyond the raw entry map this module provides the domain-level
//! accessors the rest of the crate works with: image geometry, strip
//! layout, CFA pattern, DNG active-area/crop, and the inheritable camera
//! description strings. A directory that declares CFA data eagerly
//! resolves and caches its pattern at parse time, because every pixel
//! operation depends on it and a malformed pattern should fail the parse,
//! not the thousandth pixel read.

use std::collections::BTreeMap;

use crate::buffer::ByteAccessor;
use crate::cfa::{CfaColor, CfaPattern};
use crate::error::TiffError;

use super::entry::{DirectoryEntry, IFD_ENTRY_SIZE};
use super::tags::{Photometric, Tag, TagType, RES_UNIT_NONE};

// =============================================================================
// Directory
// =============================================================================

/// One parsed IFD: the tag map plus cached derived fields.
///
/// Directories form a forest: top-level IFDs are linked through the
/// next-IFD pointer, and each may carry one level of sub-IFDs. Rather than
/// owning back-references, a directory stores the arena index of its
/// parent inside the owning [`TiffFile`](super::TiffFile) list, which
/// keeps the inheritance walk bounded and free of ownership cycles.
#[derive(Debug, Clone)]
pub struct Directory {
    offset: u64,
    entries: BTreeMap<u16, DirectoryEntry>,
    next_offset: u64,
    parent: Option<usize>,
    photometric: Option<u16>,
    bits_per_sample: Vec<u16>,
    cfa_pattern: Option<CfaPattern>,
}

impl Directory {
    /// Parse the IFD starting at `offset`.
    ///
    /// `parent` is the arena index of the owning IFD for sub-directories,
    /// `None` for top-level ones. Duplicate tags are not expected in a
    /// well-formed file; if present, the last record wins.
    pub fn parse(
        buf: &ByteAccessor,
        offset: u64,
        parent: Option<usize>,
    ) -> Result<Self, TiffError> {
        let entry_count = buf.get_u16(offset)? as u64;

        let mut entries = BTreeMap::new();
        for i in 0..entry_count {
            let entry = DirectoryEntry::parse(buf, offset + 2 + i * IFD_ENTRY_SIZE)?;
            entries.insert(entry.tag(), entry);
        }
        let next_offset = buf.get_u32(offset + 2 + entry_count * IFD_ENTRY_SIZE)? as u64;

        let mut dir = Self {
            offset,
            entries,
            next_offset,
            parent,
            photometric: None,
            bits_per_sample: Vec::new(),
            cfa_pattern: None,
        };

        if let Some(entry) = dir.entries.get(&Tag::PhotometricInterpretation.code()) {
            dir.photometric = Some(to_u16(entry.as_int(buf, 0)?, "PhotometricInterpretation")?);
        }
        dir.bits_per_sample = dir.resolve_bits_per_sample(buf)?;
        if dir.photometric == Some(Photometric::Cfa as u16) {
            dir.cfa_pattern = Some(dir.resolve_cfa_pattern(buf)?);
        }

        Ok(dir)
    }

    /// Validate and cache BitsPerSample against SamplesPerPixel.
    fn resolve_bits_per_sample(&self, buf: &ByteAccessor) -> Result<Vec<u16>, TiffError> {
        let Some(entry) = self.entries.get(&Tag::BitsPerSample.code()) else {
            return Ok(Vec::new());
        };
        let samples = self
            .entries
            .get(&Tag::SamplesPerPixel.code())
            .ok_or_else(|| {
                TiffError::InconsistentDirectory(
                    "BitsPerSample present without SamplesPerPixel".to_string(),
                )
            })?
            .as_int(buf, 0)?;
        if entry.count() as i64 != samples {
            return Err(TiffError::InconsistentDirectory(format!(
                "BitsPerSample has {} value(s) but SamplesPerPixel is {}",
                entry.count(),
                samples
            )));
        }
        entry
            .as_int_array(buf)?
            .into_iter()
            .map(|v| to_u16(v, "BitsPerSample"))
            .collect()
    }

    /// Resolve the CFA pattern geometry for a CFA directory.
    fn resolve_cfa_pattern(&self, buf: &ByteAccessor) -> Result<CfaPattern, TiffError> {
        let dims = self.entry(Tag::CfaRepeatPatternDim)?.as_int_array(buf)?;
        if dims.len() != 2 {
            return Err(TiffError::InconsistentDirectory(format!(
                "CFARepeatPatternDim has {} value(s), expected 2",
                dims.len()
            )));
        }
        let cols = to_u16(dims[0], "CFARepeatPatternDim")? as u32;
        let rows = to_u16(dims[1], "CFARepeatPatternDim")? as u32;
        if cols == 0 || rows == 0 {
            return Err(TiffError::InconsistentDirectory(
                "CFARepeatPatternDim contains a zero dimension".to_string(),
            ));
        }

        let raw = self.entry(Tag::CfaPattern)?.as_int_array(buf)?;
        if raw.len() as u64 != cols as u64 * rows as u64 {
            return Err(TiffError::InconsistentDirectory(format!(
                "CFAPattern has {} value(s) for a {}x{} pattern",
                raw.len(),
                cols,
                rows
            )));
        }
        let colors = raw
            .into_iter()
            .map(|v| {
                CfaColor::from_index(v).ok_or_else(|| {
                    TiffError::InconsistentDirectory(format!(
                        "CFAPattern color index {v} is not R/G/B"
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CfaPattern::new(cols, rows, colors))
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Offset of this IFD within the file.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Offset of the next top-level IFD, 0 at the end of the chain.
    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    /// Arena index of the parent directory, for sub-IFDs.
    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Whether an entry with this tag exists.
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.entries.contains_key(&tag.code())
    }

    /// Look up an entry, failing with `MissingTag` if absent.
    pub fn entry(&self, tag: Tag) -> Result<&DirectoryEntry, TiffError> {
        self.entries
            .get(&tag.code())
            .ok_or(TiffError::MissingTag(tag.name()))
    }

    /// All entries in ascending tag order.
    pub fn entries(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.values()
    }

    /// Number of entries in this IFD.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    // -------------------------------------------------------------------------
    // Image geometry
    // -------------------------------------------------------------------------

    /// Image width in pixels (stored as Short or Long).
    pub fn image_width(&self, buf: &ByteAccessor) -> Result<u32, TiffError> {
        to_u32(self.entry(Tag::ImageWidth)?.as_int(buf, 0)?, "ImageWidth")
    }

    /// Image height in pixels (stored as Short or Long).
    pub fn image_height(&self, buf: &ByteAccessor) -> Result<u32, TiffError> {
        to_u32(self.entry(Tag::ImageLength)?.as_int(buf, 0)?, "ImageLength")
    }

    /// Photometric interpretation value, if the tag is present.
    pub fn photometric(&self) -> Option<u16> {
        self.photometric
    }

    /// Whether this directory holds CFA sensor data.
    pub fn is_cfa(&self) -> bool {
        self.photometric == Some(Photometric::Cfa as u16)
    }

    /// Cached bits-per-sample values; empty when the tag is absent.
    pub fn bits_per_sample(&self) -> &[u16] {
        &self.bits_per_sample
    }

    /// Bits per packed CFA pixel: the first (and for CFA data, only)
    /// BitsPerSample value. This tag is authoritative; the decoder never
    /// derives the depth from strip byte counts.
    pub fn bits_per_pixel(&self) -> Result<u32, TiffError> {
        self.bits_per_sample
            .first()
            .map(|&b| b as u32)
            .ok_or(TiffError::MissingTag(Tag::BitsPerSample.name()))
    }

    /// Number of samples per pixel.
    pub fn samples_per_pixel(&self, buf: &ByteAccessor) -> Result<u16, TiffError> {
        to_u16(
            self.entry(Tag::SamplesPerPixel)?.as_int(buf, 0)?,
            "SamplesPerPixel",
        )
    }

    /// Raw compression value (1 = uncompressed).
    pub fn compression(&self, buf: &ByteAccessor) -> Result<u16, TiffError> {
        to_u16(self.entry(Tag::Compression)?.as_int(buf, 0)?, "Compression")
    }

    /// Whether the pixel data is compressed.
    pub fn is_compressed(&self, buf: &ByteAccessor) -> Result<bool, TiffError> {
        Ok(self.compression(buf)? != 1)
    }

    /// The cached CFA pattern, present iff this is a CFA directory.
    pub fn cfa_pattern(&self) -> Option<&CfaPattern> {
        self.cfa_pattern.as_ref()
    }

    // -------------------------------------------------------------------------
    // Strip layout
    // -------------------------------------------------------------------------

    /// Byte offset of each pixel strip, normalized from Short or Long.
    pub fn strip_offsets(&self, buf: &ByteAccessor) -> Result<Vec<u64>, TiffError> {
        self.entry(Tag::StripOffsets)?.as_long_array(buf)
    }

    /// Byte length of each pixel strip, normalized from Short or Long.
    pub fn strip_byte_counts(&self, buf: &ByteAccessor) -> Result<Vec<u64>, TiffError> {
        self.entry(Tag::StripByteCounts)?.as_long_array(buf)
    }

    /// Number of strips in the image.
    pub fn strips_per_image(&self) -> Result<u32, TiffError> {
        Ok(self.entry(Tag::StripOffsets)?.count())
    }

    /// Rows stored in each strip (stored as Short or Long).
    pub fn rows_per_strip(&self, buf: &ByteAccessor) -> Result<u32, TiffError> {
        to_u32(
            self.entry(Tag::RowsPerStrip)?.as_int(buf, 0)?,
            "RowsPerStrip",
        )
    }

    // -------------------------------------------------------------------------
    // Sub-directories
    // -------------------------------------------------------------------------

    /// Whether this IFD declares at least one sub-IFD.
    pub fn has_sub_directories(&self) -> bool {
        self.entries
            .get(&Tag::SubIfds.code())
            .is_some_and(|e| e.count() >= 1)
    }

    /// Byte offsets of the declared sub-IFDs.
    pub fn sub_ifd_offsets(&self, buf: &ByteAccessor) -> Result<Vec<u64>, TiffError> {
        self.entry(Tag::SubIfds)?.as_long_array(buf)
    }

    // -------------------------------------------------------------------------
    // DNG geometry
    // -------------------------------------------------------------------------

    /// The DNG active area as (x0, y0, x1, y1).
    ///
    /// The tag stores coordinates in (y0, x0, y1, x1) order; they are
    /// reordered here. Defaults to the full image rectangle when absent.
    pub fn active_area(&self, buf: &ByteAccessor) -> Result<[u32; 4], TiffError> {
        if !self.has_tag(Tag::ActiveArea) {
            let w = self.image_width(buf)?;
            let h = self.image_height(buf)?;
            return Ok([0, 0, w, h]);
        }
        let raw = self.entry(Tag::ActiveArea)?.as_int_array(buf)?;
        if raw.len() != 4 {
            return Err(TiffError::InconsistentDirectory(format!(
                "ActiveArea has {} value(s), expected 4",
                raw.len()
            )));
        }
        Ok([
            to_u32(raw[1], "ActiveArea")?,
            to_u32(raw[0], "ActiveArea")?,
            to_u32(raw[3], "ActiveArea")?,
            to_u32(raw[2], "ActiveArea")?,
        ])
    }

    /// The DNG default crop origin as (x, y), relative to the active area.
    /// Defaults to (0, 0) when absent.
    pub fn default_crop_origin(&self, buf: &ByteAccessor) -> Result<[u32; 2], TiffError> {
        self.crop_pair(buf, Tag::DefaultCropOrigin, [0, 0])
    }

    /// The DNG default crop size as (width, height). Defaults to the full
    /// image when absent.
    pub fn default_crop_size(&self, buf: &ByteAccessor) -> Result<[u32; 2], TiffError> {
        let default = [self.image_width(buf)?, self.image_height(buf)?];
        self.crop_pair(buf, Tag::DefaultCropSize, default)
    }

    /// The default crop window as (x, y, width, height).
    pub fn crop(&self, buf: &ByteAccessor) -> Result<[u32; 4], TiffError> {
        let [x, y] = self.default_crop_origin(buf)?;
        let [w, h] = self.default_crop_size(buf)?;
        Ok([x, y, w, h])
    }

    /// Shared decode for the two crop tags. Rational-encoded crops exist
    /// in the DNG spec but are not supported; they fail loudly instead of
    /// silently reading as zero.
    fn crop_pair(
        &self,
        buf: &ByteAccessor,
        tag: Tag,
        default: [u32; 2],
    ) -> Result<[u32; 2], TiffError> {
        if !self.has_tag(tag) {
            return Ok(default);
        }
        let entry = self.entry(tag)?;
        if matches!(entry.value_type(), TagType::Rational | TagType::SRational) {
            return Err(TiffError::UnsupportedEncoding(format!(
                "Rational-encoded {}",
                tag.name()
            )));
        }
        let raw = entry.as_int_array(buf)?;
        if raw.len() != 2 {
            return Err(TiffError::InconsistentDirectory(format!(
                "{} has {} value(s), expected 2",
                tag.name(),
                raw.len()
            )));
        }
        Ok([to_u32(raw[0], tag.name())?, to_u32(raw[1], tag.name())?])
    }

    // -------------------------------------------------------------------------
    // Descriptive metadata
    // -------------------------------------------------------------------------

    /// String value of a tag, absorbing lookup and decode failures.
    ///
    /// Only used for the descriptive fields where a missing or malformed
    /// value degrades to the parent directory or an empty string.
    pub fn string_value(&self, buf: &ByteAccessor, tag: Tag) -> Option<String> {
        self.entries
            .get(&tag.code())
            .and_then(|e| e.as_string(buf).ok())
    }

    /// Resolution in X direction, 0.0 when absent.
    pub fn x_resolution(&self, buf: &ByteAccessor) -> f64 {
        self.rational_or_zero(buf, Tag::XResolution)
    }

    /// Resolution in Y direction, 0.0 when absent.
    pub fn y_resolution(&self, buf: &ByteAccessor) -> f64 {
        self.rational_or_zero(buf, Tag::YResolution)
    }

    fn rational_or_zero(&self, buf: &ByteAccessor, tag: Tag) -> f64 {
        self.entries
            .get(&tag.code())
            .and_then(|e| e.as_double(buf, 0).ok())
            .unwrap_or(0.0)
    }

    /// Resolution unit, defaulting to "none" per the TIFF specification.
    pub fn resolution_unit(&self, buf: &ByteAccessor) -> u16 {
        self.entries
            .get(&Tag::ResolutionUnit.code())
            .and_then(|e| e.as_int(buf, 0).ok())
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(RES_UNIT_NONE)
    }

    /// Planar configuration (1 = chunky, 2 = planar).
    pub fn planar_configuration(&self, buf: &ByteAccessor) -> Result<u16, TiffError> {
        to_u16(
            self.entry(Tag::PlanarConfiguration)?.as_int(buf, 0)?,
            "PlanarConfiguration",
        )
    }

    /// Bit fill order, defaulting to 1 (MSB first) per the specification.
    pub fn fill_order(&self, buf: &ByteAccessor) -> u16 {
        self.entries
            .get(&Tag::FillOrder.code())
            .and_then(|e| e.as_int(buf, 0).ok())
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(1)
    }

    /// NewSubfileType value (0 = main image, 1 = thumbnail).
    pub fn new_subfile_type(&self, buf: &ByteAccessor) -> Result<u64, TiffError> {
        self.entry(Tag::NewSubfileType)?.as_long(buf, 0)
    }
}

/// Narrow a widened tag integer to u16, flagging corrupt values.
fn to_u16(value: i64, what: &str) -> Result<u16, TiffError> {
    u16::try_from(value).map_err(|_| {
        TiffError::InconsistentDirectory(format!("{what} value {value} out of u16 range"))
    })
}

/// Narrow a widened tag integer to u32, flagging corrupt values.
fn to_u32(value: i64, what: &str) -> Result<u32, TiffError> {
    u32::try_from(value).map_err(|_| {
        TiffError::InconsistentDirectory(format!("{what} value {value} out of u32 range"))
    })
}

// =============================================================================
// Tests
// =============================================================================
