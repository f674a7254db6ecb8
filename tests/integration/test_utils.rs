//! Builders for synthetic TIFF/DNG buffers.
//!
//! Offsets are hand-placed by each test, so the fixtures double as
//! documentation of the container layout under test.

/// One 12-byte IFD entry: (tag, type code, count, value/offset field).
pub type EntrySpec = (u16, u16, u32, [u8; 4]);

/// Byte-order-aware builder for a complete in-memory TIFF file.
pub struct TiffBuilder {
    pub bytes: Vec<u8>,
    big_endian: bool,
}

impl TiffBuilder {
    /// Start a file with a valid header pointing at `first_ifd`.
    pub fn new(big_endian: bool, first_ifd: u32) -> Self {
        let mut builder = Self {
            bytes: vec![0u8; 8],
            big_endian,
        };
        let marker = if big_endian { 0x4D } else { 0x49 };
        builder.bytes[0] = marker;
        builder.bytes[1] = marker;
        builder.put_u16(2, 42);
        builder.put_u32(4, first_ifd);
        builder
    }

    fn put_u16(&mut self, at: usize, value: u16) {
        let raw = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.bytes[at..at + 2].copy_from_slice(&raw);
    }

    fn put_u32(&mut self, at: usize, value: u32) {
        let raw = if self.big_endian {
            value.to_be_bytes()
        } else {
            value.to_le_bytes()
        };
        self.bytes[at..at + 4].copy_from_slice(&raw);
    }

    /// Write an IFD (count, records, next pointer) at `offset`.
    pub fn add_ifd(&mut self, offset: usize, entries: &[EntrySpec], next: u32) {
        let end = offset + 2 + entries.len() * 12 + 4;
        if self.bytes.len() < end {
            self.bytes.resize(end, 0);
        }
        self.put_u16(offset, entries.len() as u16);
        for (i, &(tag, type_code, count, value)) in entries.iter().enumerate() {
            let at = offset + 2 + i * 12;
            self.put_u16(at, tag);
            self.put_u16(at + 2, type_code);
            self.put_u32(at + 4, count);
            self.bytes[at + 8..at + 12].copy_from_slice(&value);
        }
        self.put_u32(end - 4, next);
    }

    /// Make sure the buffer extends to at least `len` bytes.
    pub fn pad_to(&mut self, len: usize) {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
        }
    }

    /// Value field holding one Short.
    pub fn short(&self, v: u16) -> [u8; 4] {
        let raw = if self.big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        };
        [raw[0], raw[1], 0, 0]
    }

    /// Value field holding two Shorts.
    pub fn two_shorts(&self, a: u16, b: u16) -> [u8; 4] {
        let a = if self.big_endian { a.to_be_bytes() } else { a.to_le_bytes() };
        let b = if self.big_endian { b.to_be_bytes() } else { b.to_le_bytes() };
        [a[0], a[1], b[0], b[1]]
    }

    /// Value field holding one Long (also used for offsets).
    pub fn long(&self, v: u32) -> [u8; 4] {
        if self.big_endian {
            v.to_be_bytes()
        } else {
            v.to_le_bytes()
        }
    }
}

/// Offset of the single IFD in [`cfa_dng`].
pub const CFA_IFD_OFFSET: u32 = 8;

/// Offset of the pixel strip in [`cfa_dng`].
pub const CFA_STRIP_OFFSET: u32 = 146;

/// A complete single-IFD little-endian CFA file: 4x2 pixels at 10 bits
/// per pixel, RGGB, one strip of 2 rows (5 bytes each) with 4 bytes of
/// trailing slack for the bit-puzzle window.
pub fn cfa_dng() -> Vec<u8> {
    let mut b = TiffBuilder::new(false, CFA_IFD_OFFSET);
    let entries = [
        (0x0100, 3, 1, b.short(4)),               // ImageWidth
        (0x0101, 3, 1, b.short(2)),               // ImageLength
        (0x0102, 3, 1, b.short(10)),              // BitsPerSample
        (0x0103, 3, 1, b.short(1)),               // Compression: none
        (0x0106, 3, 1, b.short(32803)),           // Photometric: CFA
        (0x0111, 4, 1, b.long(CFA_STRIP_OFFSET)), // StripOffsets
        (0x0115, 3, 1, b.short(1)),               // SamplesPerPixel
        (0x0116, 3, 1, b.short(2)),               // RowsPerStrip
        (0x0117, 4, 1, b.long(10)),               // StripByteCounts
        (0x828D, 3, 2, b.two_shorts(2, 2)),       // CFARepeatPatternDim
        (0x828E, 1, 4, [0, 1, 1, 2]),             // CFAPattern: RGGB
    ];
    b.add_ifd(CFA_IFD_OFFSET as usize, &entries, 0);
    assert_eq!(b.bytes.len(), CFA_STRIP_OFFSET as usize);
    b.pad_to(CFA_STRIP_OFFSET as usize + 10 + 4);
    b.bytes
}

/// Offset of the root IFD in [`nested_dng`].
pub const NESTED_ROOT_OFFSET: u32 = 8;

/// Offset of the CFA sub-IFD in [`nested_dng`].
pub const NESTED_SUB_OFFSET: u32 = 64;

/// Offset of the pixel strip in [`nested_dng`].
pub const NESTED_STRIP_OFFSET: u32 = 202;

/// A DNG-shaped file: a small RGB root IFD carrying Make/Model and a
/// SubIFDs pointer, with the CFA sensor image (4x2 at 10 bpp) living in
/// the sub-IFD. The sub-IFD has no Make of its own.
pub fn nested_dng() -> Vec<u8> {
    let mut b = TiffBuilder::new(false, NESTED_ROOT_OFFSET);
    let root = [
        (0x0100, 3, 1, b.short(2)),                // ImageWidth
        (0x0101, 3, 1, b.short(2)),                // ImageLength
        (0x010F, 2, 4, [b'A', b'C', b'M', 0]),     // Make, inline
        (0x014A, 4, 1, b.long(NESTED_SUB_OFFSET)), // SubIFDs
    ];
    b.add_ifd(NESTED_ROOT_OFFSET as usize, &root, 0);
    b.pad_to(NESTED_SUB_OFFSET as usize);

    let sub = [
        (0x0100, 3, 1, b.short(4)),
        (0x0101, 3, 1, b.short(2)),
        (0x0102, 3, 1, b.short(10)),
        (0x0103, 3, 1, b.short(1)),
        (0x0106, 3, 1, b.short(32803)),
        (0x0111, 4, 1, b.long(NESTED_STRIP_OFFSET)),
        (0x0115, 3, 1, b.short(1)),
        (0x0116, 3, 1, b.short(2)),
        (0x0117, 4, 1, b.long(10)),
        (0x828D, 3, 2, b.two_shorts(2, 2)),
        (0x828E, 1, 4, [0, 1, 1, 2]),
    ];
    b.add_ifd(NESTED_SUB_OFFSET as usize, &sub, 0);
    assert_eq!(b.bytes.len(), NESTED_STRIP_OFFSET as usize);
    b.pad_to(NESTED_STRIP_OFFSET as usize + 10 + 4);
    b.bytes
}
