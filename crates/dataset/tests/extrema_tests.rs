//! Range estimation tests.

use dataset::{estimate_range, Dataset, ScanDensity};
use test_utils::{create_axis, MemoryFile};
use view_common::SECONDARY_SENTINEL;

const FILL: f32 = -999.0;

/// One variable over (time, x) where frame t holds the values
/// [t, t + 10]. Frame extremes are exactly known per frame.
fn ramp_dataset(nframes: usize) -> Dataset {
    let mut data = Vec::with_capacity(nframes * 2);
    for t in 0..nframes {
        data.push(t as f32);
        data.push(t as f32 + 10.0);
    }
    let file = MemoryFile::new("ramp.dat")
        .with_record_axis("time")
        .with_dim("time", create_axis(nframes, 0.0, 1.0))
        .with_dim("x", create_axis(2, 0.0, 1.0))
        .with_variable("v", &["time", "x"], data, FILL)
        .build();
    Dataset::open(vec![file]).unwrap()
}

#[test]
fn exhaustive_bounds_enclose_sampled_bounds() {
    let ds = ramp_dataset(37);
    let var = ds.variable("v").unwrap();

    let exhaustive = estimate_range(var, ScanDensity::Exhaustive).unwrap();
    for density in [ScanDensity::Fast, ScanDensity::Medium, ScanDensity::Slow] {
        let sampled = estimate_range(var, density).unwrap();
        assert!(sampled.found);
        assert!(
            exhaustive.min <= sampled.min,
            "{}: exhaustive min must not exceed sampled min",
            density
        );
        assert!(
            exhaustive.max >= sampled.max,
            "{}: exhaustive max must not fall below sampled max",
            density
        );
    }
}

#[test]
fn fast_scan_sees_first_middle_last() {
    let ds = ramp_dataset(21);
    let var = ds.variable("v").unwrap();
    let estimate = estimate_range(var, ScanDensity::Fast).unwrap();
    // Frames 0, 10, 20: min 0, max 30.
    assert_eq!(estimate.min, 0.0);
    assert_eq!(estimate.max, 30.0);
}

#[test]
fn fill_and_sentinel_cells_are_excluded() {
    let data = vec![
        FILL,
        5.0, // frame 0
        SECONDARY_SENTINEL,
        7.0, // frame 1
        FILL * (1.0 + 5.0e-6),
        6.0, // frame 2: within fill tolerance
    ];
    let file = MemoryFile::new("holes.dat")
        .with_record_axis("time")
        .with_dim("time", create_axis(3, 0.0, 1.0))
        .with_dim("x", create_axis(2, 0.0, 1.0))
        .with_variable("v", &["time", "x"], data, FILL)
        .build();
    let ds = Dataset::open(vec![file]).unwrap();
    let var = ds.variable("v").unwrap();

    let estimate = estimate_range(var, ScanDensity::Exhaustive).unwrap();
    assert!(estimate.found);
    assert_eq!(estimate.min, 5.0);
    assert_eq!(estimate.max, 7.0);
}

#[test]
fn all_missing_variable_has_no_known_range() {
    let file = MemoryFile::new("empty.dat")
        .with_record_axis("time")
        .with_dim("time", create_axis(4, 0.0, 1.0))
        .with_dim("x", create_axis(3, 0.0, 1.0))
        .with_variable("v", &["time", "x"], vec![FILL; 12], FILL)
        .build();
    let ds = Dataset::open(vec![file]).unwrap();
    let var = ds.variable("v").unwrap();

    let estimate = estimate_range(var, ScanDensity::Exhaustive).unwrap();
    assert!(!estimate.found);
    assert_eq!(estimate.resolve(), (0.0, 0.0));
}

#[test]
fn estimation_spans_file_boundaries() {
    // Extremes sit in different files of a virtual variable.
    let file_a = MemoryFile::new("a.dat")
        .with_record_axis("time")
        .with_dim("time", create_axis(2, 0.0, 1.0))
        .with_dim("x", create_axis(2, 0.0, 1.0))
        .with_variable("v", &["time", "x"], vec![5.0, 6.0, 7.0, 8.0], FILL)
        .build();
    let file_b = MemoryFile::new("b.dat")
        .with_record_axis("time")
        .with_dim("time", create_axis(2, 2.0, 1.0))
        .with_dim("x", create_axis(2, 0.0, 1.0))
        .with_variable("v", &["time", "x"], vec![-50.0, 1.0, 2.0, 90.0], FILL)
        .build();
    let ds = Dataset::open(vec![file_a, file_b]).unwrap();
    let var = ds.variable("v").unwrap();

    let estimate = estimate_range(var, ScanDensity::Exhaustive).unwrap();
    assert_eq!(estimate.min, -50.0);
    assert_eq!(estimate.max, 90.0);
}
