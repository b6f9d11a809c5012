//! Raw slice to color-index mapping.
//!
//! Color tables themselves live in the presentation layer; the engine
//! publishes one byte per display cell. Index 0 is reserved for missing
//! cells, valid data maps linearly onto 1..=255 over the current range.

use view_common::is_fill;

/// Map a resampled slice onto color indices over [min, max].
pub fn map_pixels(data: &[f32], fill: f32, min: f32, max: f32) -> Vec<u8> {
    let span = max - min;
    data.iter()
        .map(|&v| {
            if is_fill(v, fill) || span <= 0.0 {
                0u8
            } else {
                let t = ((v - min) / span).clamp(0.0, 1.0);
                1 + (t * 254.0).round() as u8
            }
        })
        .collect()
}

/// Widen a degenerate (min == max) range symmetrically around the value so
/// a flat field still renders mid-scale.
pub fn widen_degenerate(min: f32, max: f32) -> (f32, f32) {
    if min != max {
        return (min, max);
    }
    let pad = if min == 0.0 { 1.0 } else { min.abs() * 0.1 };
    (min - pad, max + pad)
}
