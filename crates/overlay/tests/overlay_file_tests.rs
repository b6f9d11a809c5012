//! Overlay point-file loading and mask construction tests.

use std::io::Write;

use overlay::{load_overlay_file, OverlayMask};
use test_utils::create_axis;
use view_common::ViewError;

#[test]
fn overlay_file_marks_single_nearest_cell() {
    // Tag + version, a comment, one point: exactly one cell marked, the
    // nearest to (10.0, 20.0) on a separable grid.
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "NCVIEW-OVERLAY 1.0\n# comment\n10.0 20.0\n").unwrap();

    let points = load_overlay_file(file.path()).unwrap();
    assert_eq!(points, vec![(10.0, 20.0)]);

    let x_coords = create_axis(8, 0.0, 4.0); // 0, 4, ..., 28
    let y_coords = create_axis(6, 0.0, 8.0); // 0, 8, ..., 40
    let mask = OverlayMask::from_separable(&points, &x_coords, &y_coords);

    assert_eq!(mask.count(), 1);
    // x = 10 ties between coords 8 and 12, y = 20 between 16 and 24; the
    // lower index wins both, marking cell (2, 2).
    assert!(mask.is_set(2, 2));
}

#[test]
fn overlay_file_failures_are_reported_not_fatal() {
    let missing = load_overlay_file(std::path::Path::new("/no/such/overlay.txt"));
    match missing {
        Err(err @ ViewError::OverlayOpen { .. }) => assert!(!err.is_fatal()),
        _ => panic!("expected OverlayOpen"),
    }

    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "NCVIEW-OVERLAY 1.5\n").unwrap();
    let bad_version = load_overlay_file(file.path());
    assert!(matches!(bad_version, Err(ViewError::OverlayVersion(_))));
}

#[test]
fn descending_axis_masks_expected_cell() {
    // Latitude-style descending axis.
    let points = vec![(2.0, 55.0)];
    let x_coords = create_axis(5, 0.0, 1.0);
    let y_coords = create_axis(4, 90.0, -30.0); // 90, 60, 30, 0
    let mask = OverlayMask::from_separable(&points, &x_coords, &y_coords);
    assert_eq!(mask.count(), 1);
    assert!(mask.is_set(2, 1)); // 55 nearest 60
}

#[test]
fn burn_uses_the_fill_sentinel() {
    let points = vec![(0.0, 0.0), (3.0, 1.0)];
    let x_coords = create_axis(4, 0.0, 1.0);
    let y_coords = create_axis(2, 0.0, 1.0);
    let mask = OverlayMask::from_separable(&points, &x_coords, &y_coords);

    let mut slice = vec![7.0f32; 8];
    mask.burn(&mut slice, -1.0e30);
    assert_eq!(slice[0], -1.0e30);
    assert_eq!(slice[7], -1.0e30);
    assert_eq!(slice.iter().filter(|&&v| v == 7.0).count(), 6);
}
