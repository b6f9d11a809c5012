//! Integer-factor resampling of 2-D slices.
//!
//! A slice headed for the screen is expanded (positive magnification) or
//! contracted (negative magnification) by a whole number of cells per
//! block:
//!
//! - expansion by N maps each source cell onto an N x N destination block,
//!   either replicated or bilinearly interpolated
//! - contraction by N collapses each N x N source block into one cell,
//!   either by mean or by mode
//!
//! All four methods are aware of the fill sentinel; see the module docs of
//! [`expand`] and [`reduce`] for the exact propagation rules.

pub mod expand;
pub mod reduce;

use serde::{Deserialize, Serialize};

pub use expand::{expand_bilinear, expand_replicate};
pub use reduce::{reduce_mean, reduce_mode};

/// Method used when enlarging a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpandMethod {
    /// Destination cell = its source block's value.
    #[default]
    Replicate,
    /// Smooth interpolation between source cells.
    Bilinear,
}

impl ExpandMethod {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// Replicate.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "bilinear" => Self::Bilinear,
            _ => Self::Replicate,
        }
    }
}

impl std::fmt::Display for ExpandMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replicate => write!(f, "replicate"),
            Self::Bilinear => write!(f, "bilinear"),
        }
    }
}

/// Method used when shrinking a slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReduceMethod {
    /// Block average.
    #[default]
    Mean,
    /// Most frequent value after rounding to the nearest integer.
    Mode,
}

impl ReduceMethod {
    /// Parse from string (case-insensitive). Unknown values fall back to
    /// Mean.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "mode" => Self::Mode,
            _ => Self::Mean,
        }
    }
}

impl std::fmt::Display for ReduceMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mean => write!(f, "mean"),
            Self::Mode => write!(f, "mode"),
        }
    }
}

/// Options for a resample pass.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ResampleOptions {
    pub expand: ExpandMethod,
    pub reduce: ReduceMethod,
    /// Damping applied to the border extrapolation gradient of the
    /// bilinear expansion.
    pub edge_damping: f32,
}

impl Default for ResampleOptions {
    fn default() -> Self {
        Self {
            expand: ExpandMethod::Replicate,
            reduce: ReduceMethod::Mean,
            edge_damping: 0.2,
        }
    }
}

/// Resample a slice by a signed integer magnification.
///
/// Positive N enlarges to (N*nx, N*ny); negative N shrinks to
/// (ceil(nx/N), ceil(ny/N)). Magnifications of -1, 0 and 1 are below one
/// cell of effect and return the source unchanged.
///
/// # Returns
/// Tuple of (resampled data, destination width, destination height).
pub fn resample(
    src: &[f32],
    nx: usize,
    ny: usize,
    magnification: i32,
    fill: f32,
    opts: &ResampleOptions,
) -> (Vec<f32>, usize, usize) {
    if magnification.unsigned_abs() <= 1 || nx == 0 || ny == 0 {
        return (src.to_vec(), nx, ny);
    }

    if magnification > 0 {
        let factor = magnification as usize;
        let out = match opts.expand {
            ExpandMethod::Replicate => expand_replicate(src, nx, ny, factor),
            ExpandMethod::Bilinear => {
                expand_bilinear(src, nx, ny, factor, fill, opts.edge_damping)
            }
        };
        (out, nx * factor, ny * factor)
    } else {
        let factor = magnification.unsigned_abs() as usize;
        let out = match opts.reduce {
            ReduceMethod::Mean => reduce_mean(src, nx, ny, factor, fill),
            ReduceMethod::Mode => reduce_mode(src, nx, ny, factor, fill),
        };
        (out, nx.div_ceil(factor), ny.div_ceil(factor))
    }
}
