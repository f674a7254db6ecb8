//! Builders for synthetic little-endian TIFF buffers used across the
//! unit tests. Fixtures are hand-placed: callers choose every offset so
//! the tests double as documentation of the container layout.

/// One 12-byte IFD entry: (tag, type code, count, value/offset field).
pub(crate) type EntrySpec = (u16, u16, u32, [u8; 4]);

/// Write the 8-byte little-endian TIFF header.
pub(crate) fn write_header(bytes: &mut Vec<u8>, first_ifd: u32) {
    if bytes.len() < 8 {
        bytes.resize(8, 0);
    }
    bytes[0] = 0x49;
    bytes[1] = 0x49;
    bytes[2..4].copy_from_slice(&42u16.to_le_bytes());
    bytes[4..8].copy_from_slice(&first_ifd.to_le_bytes());
}

/// Write an IFD (entry count, records, next-IFD offset) at `offset`.
pub(crate) fn write_ifd(bytes: &mut Vec<u8>, offset: usize, entries: &[EntrySpec], next: u32) {
    let end = offset + 2 + entries.len() * 12 + 4;
    if bytes.len() < end {
        bytes.resize(end, 0);
    }
    bytes[offset..offset + 2].copy_from_slice(&(entries.len() as u16).to_le_bytes());
    for (i, &(tag, type_code, count, value)) in entries.iter().enumerate() {
        let at = offset + 2 + i * 12;
        bytes[at..at + 2].copy_from_slice(&tag.to_le_bytes());
        bytes[at + 2..at + 4].copy_from_slice(&type_code.to_le_bytes());
        bytes[at + 4..at + 8].copy_from_slice(&count.to_le_bytes());
        bytes[at + 8..at + 12].copy_from_slice(&value);
    }
    bytes[end - 4..end].copy_from_slice(&next.to_le_bytes());
}

/// Inline value field for a single Short.
pub(crate) fn short_value(v: u16) -> [u8; 4] {
    let b = v.to_le_bytes();
    [b[0], b[1], 0, 0]
}

/// Inline value field for two Shorts.
pub(crate) fn two_shorts(a: u16, b: u16) -> [u8; 4] {
    let a = a.to_le_bytes();
    let b = b.to_le_bytes();
    [a[0], a[1], b[0], b[1]]
}

/// Inline value field for a single Long (also used for offsets).
pub(crate) fn long_value(v: u32) -> [u8; 4] {
    v.to_le_bytes()
}

/// Offset of the IFD in [`synthetic_cfa_dng`].
pub(crate) const CFA_IFD_OFFSET: u32 = 8;

/// Offset of the pixel strip in [`synthetic_cfa_dng`].
pub(crate) const CFA_STRIP_OFFSET: u32 = 146;

/// A complete single-IFD CFA file: 4x2 pixels, 10 bits per pixel, RGGB
/// pattern, one strip of 2 rows (5 bytes per row), followed by 4 bytes of
/// slack so the 4-byte bit-puzzle window stays in bounds for every pixel.
pub(crate) fn synthetic_cfa_dng() -> Vec<u8> {
    let mut bytes = Vec::new();
    write_header(&mut bytes, CFA_IFD_OFFSET);
    write_ifd(
        &mut bytes,
        CFA_IFD_OFFSET as usize,
        &[
            (0x0100, 3, 1, short_value(4)),                 // ImageWidth
            (0x0101, 3, 1, short_value(2)),                 // ImageLength
            (0x0102, 3, 1, short_value(10)),                // BitsPerSample
            (0x0103, 3, 1, short_value(1)),                 // Compression: none
            (0x0106, 3, 1, short_value(32803)),             // Photometric: CFA
            (0x0111, 4, 1, long_value(CFA_STRIP_OFFSET)),   // StripOffsets
            (0x0115, 3, 1, short_value(1)),                 // SamplesPerPixel
            (0x0116, 3, 1, short_value(2)),                 // RowsPerStrip
            (0x0117, 4, 1, long_value(10)),                 // StripByteCounts
            (0x828D, 3, 2, two_shorts(2, 2)),               // CFARepeatPatternDim
            (0x828E, 1, 4, [0, 1, 1, 2]),                   // CFAPattern: RGGB
        ],
        0,
    );
    debug_assert_eq!(bytes.len(), CFA_STRIP_OFFSET as usize);
    bytes.resize(CFA_STRIP_OFFSET as usize + 10 + 4, 0);
    bytes
}
