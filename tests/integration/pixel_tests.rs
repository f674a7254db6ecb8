//! End-to-end pixel scenarios: bit-exact patching, buffer round-trips,
//! and the export collaborators.

use dngpatch::{demosaic_to_png, pixel_report, raw_to_png, PixelError, RawFrame, TiffFile};

use super::test_utils::{cfa_dng, nested_dng, CFA_STRIP_OFFSET};

// =============================================================================
// Patch scenario
// =============================================================================

#[test]
fn test_patch_pixel_end_to_end() {
    // 4x2 at 10 bpp in one strip: write (3, 1) = 1000, read it back, and
    // verify the extracted grid differs at exactly that cell.
    let mut file = TiffFile::parse(cfa_dng()).unwrap();
    let index = file.first_cfa_directory().unwrap();
    let layout = file.cfa_layout(index).unwrap();

    let before = layout.pixel_grid(file.buffer()).unwrap();
    layout.set_pixel(file.buffer_mut(), 3, 1, 1000).unwrap();
    assert_eq!(layout.pixel(file.buffer(), 3, 1).unwrap(), 1000);

    let after = layout.pixel_grid(file.buffer()).unwrap();
    for y in 0..2 {
        for x in 0..4 {
            let expected = if (x, y) == (3, 1) { 1000 } else { before.get(x, y) };
            assert_eq!(after.get(x, y), expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_patch_survives_serialization() {
    let mut file = TiffFile::parse(cfa_dng()).unwrap();
    let layout = file.cfa_layout(0).unwrap();
    layout.set_pixel(file.buffer_mut(), 2, 0, 777).unwrap();

    // Round-trip through bytes, as the CLI save/load does.
    let reparsed = TiffFile::parse(file.into_bytes()).unwrap();
    let layout = reparsed.cfa_layout(0).unwrap();
    assert_eq!(layout.pixel(reparsed.buffer(), 2, 0).unwrap(), 777);
}

#[test]
fn test_patch_mutates_only_pixel_bytes() {
    let original = cfa_dng();
    let mut file = TiffFile::parse(original.clone()).unwrap();
    let layout = file.cfa_layout(0).unwrap();
    layout.set_pixel(file.buffer_mut(), 0, 0, 0x3FF).unwrap();

    let patched = file.into_bytes();
    assert_eq!(patched.len(), original.len());
    // Everything before the strip is byte-identical.
    assert_eq!(
        &patched[..CFA_STRIP_OFFSET as usize],
        &original[..CFA_STRIP_OFFSET as usize]
    );
    assert_ne!(patched, original);
}

#[test]
fn test_patch_in_nested_dng() {
    let mut file = TiffFile::parse(nested_dng()).unwrap();
    let index = file.first_cfa_directory().unwrap();
    let layout = file.cfa_layout(index).unwrap();

    layout.set_pixel(file.buffer_mut(), 1, 0, 513).unwrap();
    assert_eq!(layout.pixel(file.buffer(), 1, 0).unwrap(), 513);
}

#[test]
fn test_out_of_bounds_patch_is_rejected() {
    let mut file = TiffFile::parse(cfa_dng()).unwrap();
    let layout = file.cfa_layout(0).unwrap();
    assert!(matches!(
        layout.set_pixel(file.buffer_mut(), 4, 0, 1),
        Err(PixelError::PixelOutOfBounds { .. })
    ));
}

// =============================================================================
// Export collaborators
// =============================================================================

#[test]
fn test_raw_export_produces_png() {
    let mut file = TiffFile::parse(cfa_dng()).unwrap();
    let layout = file.cfa_layout(0).unwrap();
    layout.fill(file.buffer_mut(), true).unwrap();

    let grid = layout.pixel_grid(file.buffer()).unwrap();
    let png = raw_to_png(&grid, &layout, true).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (4, 2));
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
}

#[test]
fn test_demosaic_produces_png() {
    let mut file = TiffFile::parse(cfa_dng()).unwrap();
    let layout = file.cfa_layout(0).unwrap();
    layout.fill(file.buffer_mut(), true).unwrap();

    let grid = layout.pixel_grid(file.buffer()).unwrap();
    let png = demosaic_to_png(&grid, &layout).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (4, 2));
}

#[test]
fn test_pixel_report_names_the_color() {
    let file = TiffFile::parse(cfa_dng()).unwrap();
    let layout = file.cfa_layout(0).unwrap();
    let report = pixel_report(&layout, file.buffer(), 0, 0).unwrap();
    assert!(report.contains("is red"));
}

// =============================================================================
// Flat frames
// =============================================================================

#[test]
fn test_raw_frame_edit_then_swap_workflow() {
    // Clone-edit-swap: the working copy absorbs the edits, the original
    // stays pristine until the caller swaps.
    let frame = RawFrame::new(vec![0u8; 2 * 7 + 4], 4, 2, 14).unwrap();
    let mut working = frame.clone();

    working.set_pixel(0, 0, 9000).unwrap();
    working.set_pixel(3, 1, 9001).unwrap();

    assert_eq!(frame.pixel(0, 0).unwrap(), 0);
    assert_eq!(working.pixel(0, 0).unwrap(), 9000);
    assert_eq!(working.pixel(3, 1).unwrap(), 9001);

    let swapped = working;
    assert_eq!(swapped.pixel_grid().unwrap().get(3, 1), 9001);
}
