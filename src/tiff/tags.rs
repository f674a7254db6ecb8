//! TIFF tag and value-type definitions.
//!
//! This module defines the vocabulary for IFD parsing:
//! - Value types (TIFF type codes 1-12) with their encoded widths
//! - Tag IDs for the baseline and DNG tags the decoder understands
//! - Photometric interpretation values
//!
//! Tags not listed here still parse (the entry map keys on the raw u16),
//! they just have no dedicated accessor.

// =============================================================================
// TIFF Value Types
// =============================================================================

/// TIFF value types, mapped 1:1 from the numeric type codes 1-12.
///
/// The width of a type decides whether an entry's values fit inside the
/// 4-byte value field of the 12-byte tag record or live at an external
/// offset. An unrecognized code is a hard parse error, not a skippable
/// condition, because the entry's byte size would be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum TagType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 7-bit ASCII text, NUL-terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two LONGs: numerator, denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLONGs: numerator, denominator
    SRational = 10,

    /// IEEE 32-bit float
    Float = 11,

    /// IEEE 64-bit float
    Double = 12,
}

impl TagType {
    /// Map a raw TIFF type code to a TagType.
    ///
    /// Returns `None` for codes outside 1-12.
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            1 => Some(TagType::Byte),
            2 => Some(TagType::Ascii),
            3 => Some(TagType::Short),
            4 => Some(TagType::Long),
            5 => Some(TagType::Rational),
            6 => Some(TagType::SByte),
            7 => Some(TagType::Undefined),
            8 => Some(TagType::SShort),
            9 => Some(TagType::SLong),
            10 => Some(TagType::SRational),
            11 => Some(TagType::Float),
            12 => Some(TagType::Double),
            _ => None,
        }
    }

    /// Encoded width of one value of this type, in bytes.
    #[inline]
    pub const fn width(self) -> u32 {
        match self {
            TagType::Byte | TagType::Ascii | TagType::SByte | TagType::Undefined => 1,
            TagType::Short | TagType::SShort => 2,
            TagType::Long | TagType::SLong | TagType::Float => 4,
            TagType::Rational | TagType::SRational | TagType::Double => 8,
        }
    }
}

// =============================================================================
// TIFF / DNG Tags
// =============================================================================

/// Tag IDs relevant to raw DNG decoding.
///
/// Covers the baseline image-structure tags, the strip layout, the
/// camera-description strings, and the CFA/DNG tags needed for sensor
/// pixel access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Tag {
    /// 0 for a regular image, 1 for a thumbnail
    NewSubfileType = 0x00FE,

    /// Image width in pixels
    ImageWidth = 0x0100,

    /// Image height (length) in pixels
    ImageLength = 0x0101,

    /// Bits per sample, one value per sample
    BitsPerSample = 0x0102,

    /// Compression scheme (1 = uncompressed)
    Compression = 0x0103,

    /// Photometric interpretation (CFA, RGB, ...)
    PhotometricInterpretation = 0x0106,

    /// Bit fill order within a byte (1 = MSB first, the default)
    FillOrder = 0x010A,

    /// Description string
    ImageDescription = 0x010E,

    /// Camera manufacturer, inheritable from the parent IFD
    Make = 0x010F,

    /// Camera model, inheritable from the parent IFD
    Model = 0x0110,

    /// Byte offsets of the pixel data strips
    StripOffsets = 0x0111,

    /// Image orientation
    Orientation = 0x0112,

    /// Number of components per pixel (1 for CFA data)
    SamplesPerPixel = 0x0115,

    /// Row count per strip
    RowsPerStrip = 0x0116,

    /// Byte counts of the pixel data strips
    StripByteCounts = 0x0117,

    /// Pixels per unit in X direction
    XResolution = 0x011A,

    /// Pixels per unit in Y direction
    YResolution = 0x011B,

    /// Component organization (1 = chunky, 2 = planar)
    PlanarConfiguration = 0x011C,

    /// Unit of resolution (1 = none, 2 = inch, 3 = centimeter)
    ResolutionUnit = 0x0128,

    /// Producing software, inheritable from the parent IFD
    Software = 0x0131,

    /// Creation timestamp, inheritable from the parent IFD
    DateTime = 0x0132,

    /// Byte offsets of sub-IFDs (one nesting level)
    SubIfds = 0x014A,

    /// Columns and rows of the repeating CFA pattern
    CfaRepeatPatternDim = 0x828D,

    /// CFA pattern color indices, row-major
    CfaPattern = 0x828E,

    /// DNG: sensor rectangle that holds real image data
    ActiveArea = 0xC68D,

    /// DNG: top-left corner of the default crop, relative to the active area
    DefaultCropOrigin = 0xC61F,

    /// DNG: width and height of the default crop
    DefaultCropSize = 0xC620,
}

impl Tag {
    /// Numeric tag ID.
    #[inline]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Human-readable tag name, for error messages and the info dump.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::NewSubfileType => "NewSubfileType",
            Tag::ImageWidth => "ImageWidth",
            Tag::ImageLength => "ImageLength",
            Tag::BitsPerSample => "BitsPerSample",
            Tag::Compression => "Compression",
            Tag::PhotometricInterpretation => "PhotometricInterpretation",
            Tag::FillOrder => "FillOrder",
            Tag::ImageDescription => "ImageDescription",
            Tag::Make => "Make",
            Tag::Model => "Model",
            Tag::StripOffsets => "StripOffsets",
            Tag::Orientation => "Orientation",
            Tag::SamplesPerPixel => "SamplesPerPixel",
            Tag::RowsPerStrip => "RowsPerStrip",
            Tag::StripByteCounts => "StripByteCounts",
            Tag::XResolution => "XResolution",
            Tag::YResolution => "YResolution",
            Tag::PlanarConfiguration => "PlanarConfiguration",
            Tag::ResolutionUnit => "ResolutionUnit",
            Tag::Software => "Software",
            Tag::DateTime => "DateTime",
            Tag::SubIfds => "SubIFDs",
            Tag::CfaRepeatPatternDim => "CFARepeatPatternDim",
            Tag::CfaPattern => "CFAPattern",
            Tag::ActiveArea => "ActiveArea",
            Tag::DefaultCropOrigin => "DefaultCropOrigin",
            Tag::DefaultCropSize => "DefaultCropSize",
        }
    }
}

// =============================================================================
// Photometric Interpretation
// =============================================================================

/// Photometric interpretation values the decoder recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum Photometric {
    /// Grayscale, black is zero
    Grayscale = 1,

    /// Interleaved RGB
    Rgb = 2,

    /// Luma/chroma
    YCbCr = 6,

    /// Color filter array (raw sensor mosaic)
    Cfa = 32803,
}

impl Photometric {
    /// Map a raw photometric value. Returns `None` for values outside the
    /// recognized set; such directories still parse, they just cannot be
    /// used for CFA pixel access.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Photometric::Grayscale),
            2 => Some(Photometric::Rgb),
            6 => Some(Photometric::YCbCr),
            32803 => Some(Photometric::Cfa),
            _ => None,
        }
    }

    /// Human-readable name for the info dump.
    pub const fn name(self) -> &'static str {
        match self {
            Photometric::Grayscale => "Grayscale",
            Photometric::Rgb => "RGB",
            Photometric::YCbCr => "YCbCr",
            Photometric::Cfa => "CFA",
        }
    }
}

/// Planar configuration: chunky (interleaved) component storage.
pub const PLANAR_CHUNKY: u16 = 1;

/// Resolution unit: no absolute unit.
pub const RES_UNIT_NONE: u16 = 1;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_type_from_u16_covers_all_codes() {
        for code in 1..=12 {
            assert!(TagType::from_u16(code).is_some(), "code {code} must map");
        }
        assert_eq!(TagType::from_u16(0), None);
        assert_eq!(TagType::from_u16(13), None);
        assert_eq!(TagType::from_u16(99), None);
    }

    #[test]
    fn test_tag_type_widths() {
        assert_eq!(TagType::Byte.width(), 1);
        assert_eq!(TagType::Ascii.width(), 1);
        assert_eq!(TagType::Short.width(), 2);
        assert_eq!(TagType::Long.width(), 4);
        assert_eq!(TagType::Rational.width(), 8);
        assert_eq!(TagType::SByte.width(), 1);
        assert_eq!(TagType::Undefined.width(), 1);
        assert_eq!(TagType::SShort.width(), 2);
        assert_eq!(TagType::SLong.width(), 4);
        assert_eq!(TagType::SRational.width(), 8);
        assert_eq!(TagType::Float.width(), 4);
        assert_eq!(TagType::Double.width(), 8);
    }

    #[test]
    fn test_tag_codes() {
        assert_eq!(Tag::ImageWidth.code(), 256);
        assert_eq!(Tag::ImageLength.code(), 257);
        assert_eq!(Tag::StripOffsets.code(), 273);
        assert_eq!(Tag::SubIfds.code(), 330);
        assert_eq!(Tag::CfaRepeatPatternDim.code(), 0x828D);
        assert_eq!(Tag::ActiveArea.code(), 0xC68D);
    }

    #[test]
    fn test_photometric_from_u16() {
        assert_eq!(Photometric::from_u16(1), Some(Photometric::Grayscale));
        assert_eq!(Photometric::from_u16(2), Some(Photometric::Rgb));
        assert_eq!(Photometric::from_u16(32803), Some(Photometric::Cfa));
        assert_eq!(Photometric::from_u16(3), None);
    }

    #[test]
    fn test_photometric_names() {
        assert_eq!(Photometric::Cfa.name(), "CFA");
        assert_eq!(Photometric::Rgb.name(), "RGB");
    }
}
