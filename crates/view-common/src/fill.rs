//! Fill-sentinel matching.
//!
//! Data producers are inconsistent about missing values: the declared fill
//! value may differ from stored cells by float rounding, and some files use
//! a large "missing" constant without declaring it. Range scans and block
//! averaging both need one shared notion of "is this cell missing".

/// Secondary hard-coded missing sentinel seen in the wild regardless of the
/// declared fill value.
pub const SECONDARY_SENTINEL: f32 = 1.0e35;

/// Relative tolerance for matching the declared fill value.
const FILL_TOLERANCE: f32 = 1.0e-5;

/// Check whether a cell value counts as missing for the given fill value.
///
/// Matches the declared fill within a relative tolerance of 1e-5 (absolute
/// when the fill value is zero), the secondary sentinel, or NaN (the read
/// contract normalizes NaNs to the fill sentinel, but data that bypassed it
/// still must not poison a min/max fold).
pub fn is_fill(value: f32, fill: f32) -> bool {
    if value.is_nan() {
        return true;
    }
    if value == SECONDARY_SENTINEL {
        return true;
    }
    if fill == 0.0 {
        value.abs() <= FILL_TOLERANCE
    } else {
        (value - fill).abs() <= fill.abs() * FILL_TOLERANCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fill_matches() {
        assert!(is_fill(-999.0, -999.0));
        assert!(is_fill(1.0e20, 1.0e20));
    }

    #[test]
    fn test_relative_tolerance() {
        // Within 1e-5 relative of the fill value
        assert!(is_fill(-999.001, -999.0));
        // Well outside
        assert!(!is_fill(-998.0, -999.0));
        assert!(!is_fill(0.0, -999.0));
    }

    #[test]
    fn test_zero_fill_uses_absolute_tolerance() {
        assert!(is_fill(0.0, 0.0));
        assert!(is_fill(5.0e-6, 0.0));
        assert!(!is_fill(0.001, 0.0));
    }

    #[test]
    fn test_secondary_sentinel() {
        assert!(is_fill(SECONDARY_SENTINEL, -999.0));
    }

    #[test]
    fn test_nan_is_fill() {
        assert!(is_fill(f32::NAN, -999.0));
    }
}
