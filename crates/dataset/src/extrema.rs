//! Sampled extrema estimation.
//!
//! Scanning every frame of a long concatenation just to pick a color range
//! is wasteful; a handful of well-spread frames bounds the range closely
//! for most fields. The density is configurable up to an exhaustive scan.

use serde::{Deserialize, Serialize};
use view_common::{is_fill, ViewResult};

use crate::variable::Variable;

/// How many frames along the concatenation axis to sample.
///
/// First, middle and last frame are always read. The other levels add:
/// - **Medium**: the two quartile frames
/// - **Slow**: the eight decile frames
/// - **Exhaustive**: every remaining frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanDensity {
    #[default]
    Fast,
    Medium,
    Slow,
    Exhaustive,
}

impl ScanDensity {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// Fast.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "medium" => Self::Medium,
            "slow" => Self::Slow,
            "exhaustive" | "all" => Self::Exhaustive,
            _ => Self::Fast,
        }
    }
}

impl std::fmt::Display for ScanDensity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fast => write!(f, "fast"),
            Self::Medium => write!(f, "medium"),
            Self::Slow => write!(f, "slow"),
            Self::Exhaustive => write!(f, "exhaustive"),
        }
    }
}

/// Result of a range scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeEstimate {
    pub min: f32,
    pub max: f32,
    /// False when no valid cell was seen in any sampled frame.
    pub found: bool,
}

impl RangeEstimate {
    /// Collapse the "no known range" condition: when nothing valid was
    /// found, both bounds reset to zero.
    pub fn resolve(self) -> (f32, f32) {
        if self.found {
            (self.min, self.max)
        } else {
            (0.0, 0.0)
        }
    }
}

/// Estimate the global min/max of a variable by sampling frames along the
/// concatenation axis at the given density. Cells matching the fill value
/// (or the secondary sentinel) are excluded from the bounds.
pub fn estimate_range(var: &Variable, density: ScanDensity) -> ViewResult<RangeEstimate> {
    let nframes = var.shape.first().copied().unwrap_or(0);
    let frames = sample_frames(nframes, density);

    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    let mut found = false;

    for frame in frames {
        let data = var.read_frame(frame)?;
        for &v in &data {
            if is_fill(v, var.fill_value) {
                continue;
            }
            found = true;
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }
    }

    Ok(RangeEstimate { min, max, found })
}

/// Frame indices to sample for a given extent and density, deduplicated and
/// in ascending order.
fn sample_frames(nframes: usize, density: ScanDensity) -> Vec<usize> {
    if nframes == 0 {
        return Vec::new();
    }
    let last = nframes - 1;
    let mut picks = vec![0, last, nframes / 2];

    match density {
        ScanDensity::Fast => {}
        ScanDensity::Medium => {
            picks.push(nframes / 4);
            picks.push(3 * nframes / 4);
        }
        ScanDensity::Slow => {
            for decile in [1usize, 2, 3, 4, 6, 7, 8, 9] {
                picks.push(decile * nframes / 10);
            }
        }
        ScanDensity::Exhaustive => {
            picks.extend(0..nframes);
        }
    }

    picks.sort_unstable();
    picks.dedup();
    picks.retain(|&f| f < nframes);
    picks
}
