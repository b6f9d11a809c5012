//! Coordinate resolution tests: curvilinear fields, per-file scalars,
//! bounds authority, and cross-file unit handling.

use dataset::{CoordinateResolver, Dataset, UnitsConverter};
use test_utils::{create_axis, create_curvilinear_fields, MemoryFile};

const FILL: f32 = -999.0;

/// A variable over (time, y, x) whose horizontal coordinates come from 2-D
/// `lon`/`lat` fields.
fn curvilinear_dataset() -> Dataset {
    let (lon, lat) = create_curvilinear_fields(4, 3);
    let file = MemoryFile::new("curv.dat")
        .with_record_axis("time")
        .with_dim("time", create_axis(2, 0.0, 1.0))
        .with_dim("y", create_axis(3, 0.0, 1.0))
        .with_dim("x", create_axis(4, 0.0, 1.0))
        .with_variable("sst", &["time", "y", "x"], vec![1.0; 24], FILL)
        .with_variable("lon", &["y", "x"], lon.iter().map(|&v| v as f32).collect(), FILL)
        .with_variable("lat", &["y", "x"], lat.iter().map(|&v| v as f32).collect(), FILL)
        .with_coord_mapping("sst", "x", "lon")
        .with_coord_mapping("sst", "y", "lat")
        .build();
    Dataset::open(vec![file]).unwrap()
}

#[test]
fn curvilinear_coordinate_comes_from_cached_field() {
    let ds = curvilinear_dataset();
    let var = ds.variable("sst").unwrap();
    let resolver = CoordinateResolver::new();

    // Cell (time=1, y=2, x=3): lon = 3 + 0.1*2, lat = 2 + 0.05*3.
    let x = resolver.resolve(var, 2, 3, &[1, 2, 3], None).unwrap();
    assert!((x.value - 3.2).abs() < 1e-6);
    let y = resolver.resolve(var, 1, 2, &[1, 2, 3], None).unwrap();
    assert!((y.value - 2.15).abs() < 1e-6);
}

#[test]
fn curvilinear_value_ignores_scan_position() {
    let ds = curvilinear_dataset();
    let var = ds.variable("sst").unwrap();
    let resolver = CoordinateResolver::new();

    let at_t0 = resolver.resolve(var, 2, 1, &[0, 0, 1], None).unwrap();
    let at_t1 = resolver.resolve(var, 2, 1, &[1, 0, 1], None).unwrap();
    assert_eq!(at_t0.value, at_t1.value);
}

#[test]
fn scalar_mapping_resolves_per_file() {
    // Two files with one record each; the mapped scalar differs per file.
    let make = |name: &str, t0: f64, height: f32| {
        MemoryFile::new(name)
            .with_record_axis("time")
            .with_dim("time", vec![t0])
            .with_dim("one", vec![0.0])
            .with_dim("x", create_axis(3, 0.0, 1.0))
            .with_variable("v", &["time", "x"], vec![1.0, 2.0, 3.0], FILL)
            .with_variable("height", &["one"], vec![height], FILL)
            .with_coord_mapping("v", "time", "height")
            .build()
    };
    let ds = Dataset::open(vec![make("a.dat", 0.0, 10.0), make("b.dat", 1.0, 20.0)]).unwrap();
    let var = ds.variable("v").unwrap();
    let resolver = CoordinateResolver::new();

    let first = resolver.resolve(var, 0, 0, &[0, 0], None).unwrap();
    let second = resolver.resolve(var, 0, 1, &[1, 0], None).unwrap();
    assert_eq!(first.value, 10.0);
    assert_eq!(second.value, 20.0);
}

#[test]
fn bounds_midpoint_overrides_raw_coordinate() {
    let file = MemoryFile::new("b.dat")
        .with_dim("x", vec![0.0, 0.9, 2.1])
        .with_bounds("x", vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)])
        .with_variable("v", &["x"], vec![1.0, 2.0, 3.0], FILL)
        .build();
    let ds = Dataset::open(vec![file]).unwrap();
    let var = ds.variable("v").unwrap();
    let resolver = CoordinateResolver::new();

    // Raw coordinate 0.9, bounds (1.0, 2.0): the midpoint 1.5 wins.
    let coord = resolver.resolve(var, 0, 1, &[1], None).unwrap();
    assert_eq!(coord.value, 1.5);
    assert_eq!(coord.bounds, Some((1.0, 2.0)));
}

struct HoursToDays;

impl UnitsConverter for HoursToDays {
    fn convert(&self, value: f64, from_units: &str, to_units: &str) -> Option<f64> {
        match (from_units, to_units) {
            ("hours", "days") => Some(value / 24.0),
            ("days", "hours") => Some(value * 24.0),
            _ => None,
        }
    }
}

fn mixed_units_dataset() -> Dataset {
    let file_a = MemoryFile::new("a.dat")
        .with_record_axis("time")
        .with_dim_units("time", vec![0.0, 1.0], "days", None)
        .with_dim("x", create_axis(2, 0.0, 1.0))
        .with_variable("v", &["time", "x"], vec![1.0; 4], FILL)
        .build();
    let file_b = MemoryFile::new("b.dat")
        .with_record_axis("time")
        .with_dim_units("time", vec![48.0, 72.0], "hours", None)
        .with_dim("x", create_axis(2, 0.0, 1.0))
        .with_variable("v", &["time", "x"], vec![2.0; 4], FILL)
        .build();
    Dataset::open(vec![file_a, file_b]).unwrap()
}

#[test]
fn cross_file_units_convert_into_first_files_units() {
    let ds = mixed_units_dataset();
    let var = ds.variable("v").unwrap();
    let resolver = CoordinateResolver::new();

    // Record 2 is the second file's record 0: 48 hours -> 2 days.
    let coord = resolver
        .resolve(var, 0, 2, &[2, 0], Some(&HoursToDays))
        .unwrap();
    assert_eq!(coord.value, 2.0);
}

#[test]
fn missing_converter_returns_unconverted_value() {
    let ds = mixed_units_dataset();
    let var = ds.variable("v").unwrap();
    let resolver = CoordinateResolver::new();

    let coord = resolver.resolve(var, 0, 2, &[2, 0], None).unwrap();
    assert_eq!(coord.value, 48.0);
    // Resolving again must not fail either (the warning fires once).
    let again = resolver.resolve(var, 0, 3, &[3, 0], None).unwrap();
    assert_eq!(again.value, 72.0);
}

#[test]
fn time_like_dimension_labels_as_calendar_date() {
    let file = MemoryFile::new("t.dat")
        .with_record_axis("time")
        .with_dim_units("time", vec![0.0, 31.0], "days since 2000-01-01", None)
        .with_dim("x", create_axis(2, 0.0, 1.0))
        .with_variable("v", &["time", "x"], vec![0.0; 4], FILL)
        .build();
    let ds = Dataset::open(vec![file]).unwrap();
    let var = ds.variable("v").unwrap();
    let resolver = CoordinateResolver::new();

    let coord = resolver.resolve(var, 0, 1, &[1, 0], None).unwrap();
    assert!(coord.label.starts_with("2000-02-01"), "label: {}", coord.label);
}
