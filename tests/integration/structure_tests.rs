//! Container-structure scenarios: header contract, chain traversal,
//! sub-IFD attachment, and tag inheritance.

use dngpatch::{ByteOrder, FileInfo, TiffError, TiffFile};

use super::test_utils::{cfa_dng, nested_dng, TiffBuilder};

// =============================================================================
// Header contract
// =============================================================================

#[test]
fn test_rejects_non_tiff_bytes() {
    let result = TiffFile::parse(b"not a tiff file at all....".to_vec());
    assert!(matches!(result, Err(TiffError::InvalidHeader(_))));
}

#[test]
fn test_rejects_truncated_file() {
    let result = TiffFile::parse(vec![0x49, 0x49, 0x2A, 0x00, 8, 0, 0, 0]);
    assert!(matches!(result, Err(TiffError::InvalidHeader(_))));
}

#[test]
fn test_rejects_wrong_version_marker() {
    let mut builder = TiffBuilder::new(false, 8);
    builder.add_ifd(8, &[], 0);
    builder.pad_to(24);
    let mut bytes = builder.bytes;
    bytes[2] = 41;
    assert!(matches!(
        TiffFile::parse(bytes),
        Err(TiffError::InvalidHeader(_))
    ));
}

#[test]
fn test_big_endian_file_parses() {
    let mut b = TiffBuilder::new(true, 8);
    let entries = [(0x0100u16, 3u16, 1u32, b.short(640))];
    b.add_ifd(8, &entries, 0);
    b.pad_to(32);

    let file = TiffFile::parse(b.bytes).unwrap();
    assert_eq!(file.byte_order(), ByteOrder::BigEndian);
    let dir = &file.directories()[0];
    assert_eq!(dir.image_width(file.buffer()).unwrap(), 640);
}

// =============================================================================
// Chain traversal
// =============================================================================

#[test]
fn test_three_directory_chain_in_order() {
    let mut b = TiffBuilder::new(false, 8);
    let a = [(0x0100u16, 3u16, 1u32, b.short(400))];
    let c = [(0x0100u16, 3u16, 1u32, b.short(100))];
    let m = [(0x0100u16, 3u16, 1u32, b.short(200))];
    // Physically out of order on purpose: A at 8 -> B at 80 -> C at 40.
    b.add_ifd(8, &a, 80);
    b.add_ifd(40, &c, 0);
    b.add_ifd(80, &m, 40);

    let file = TiffFile::parse(b.bytes).unwrap();
    let widths: Vec<u32> = file
        .directories()
        .iter()
        .map(|d| d.image_width(file.buffer()).unwrap())
        .collect();
    // Traversal follows the chain links, not file position.
    assert_eq!(widths, vec![400, 200, 100]);
    assert_eq!(file.directories()[2].next_offset(), 0);
}

// =============================================================================
// Sub-IFDs and inheritance
// =============================================================================

#[test]
fn test_sub_ifd_is_attached_after_parent() {
    let file = TiffFile::parse(nested_dng()).unwrap();
    let dirs = file.directories();

    assert_eq!(dirs.len(), 2);
    assert!(dirs[0].has_sub_directories());
    assert!(!dirs[1].has_sub_directories());
    assert_eq!(dirs[1].parent(), Some(0));
}

#[test]
fn test_make_falls_back_to_parent() {
    let file = TiffFile::parse(nested_dng()).unwrap();
    // The sub-IFD has no Make tag; the value comes from the root.
    assert_eq!(file.make(0), "ACM");
    assert_eq!(file.make(1), "ACM");
    // Nothing in the file resolves these.
    assert_eq!(file.model(1), "");
    assert_eq!(file.software(1), "");
    assert_eq!(file.datetime(1), "");
}

#[test]
fn test_first_cfa_directory_is_the_sub_ifd() {
    let file = TiffFile::parse(nested_dng()).unwrap();
    assert_eq!(file.first_cfa_directory(), Some(1));

    let layout = file.cfa_layout(1).unwrap();
    assert_eq!(layout.width(), 4);
    assert_eq!(layout.height(), 2);
    assert_eq!(layout.bits_per_pixel(), 10);
}

// =============================================================================
// Info summary
// =============================================================================

#[test]
fn test_file_info_covers_the_forest() {
    let file = TiffFile::parse(nested_dng()).unwrap();
    let info = FileInfo::from_file(&file);

    assert_eq!(info.directories.len(), 2);
    assert_eq!(info.directories[0].photometric, None);
    assert_eq!(info.directories[1].photometric.as_deref(), Some("CFA"));
    assert_eq!(info.directories[1].parent, Some(0));
    // Inherited strings appear on the sub-IFD summary too.
    assert_eq!(info.directories[1].make, "ACM");

    let json = serde_json::to_string(&info).unwrap();
    assert!(json.contains("\"byte_order\":\"little-endian\""));
}

#[test]
fn test_single_ifd_summary() {
    let file = TiffFile::parse(cfa_dng()).unwrap();
    let info = FileInfo::from_file(&file);
    assert_eq!(info.directories.len(), 1);
    assert_eq!(info.directories[0].width, Some(4));
    assert_eq!(info.directories[0].bits_per_sample, vec![10]);
    assert_eq!(info.directories[0].cfa_pattern_dim, Some([2, 2]));
}
