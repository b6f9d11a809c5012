//! Block contraction: mean and mode.
//!
//! Contraction by N collapses each N x N source block into one destination
//! cell. Any fill value inside a block poisons the whole destination cell
//! to fill; a partially-missing average would invent data. When the source
//! extent is not a multiple of the block size, out-of-range offsets clamp
//! to the last valid row/column rather than shrinking the window.

use rayon::prelude::*;
use view_common::is_fill;

/// Contract by block average.
pub fn reduce_mean(src: &[f32], nx: usize, ny: usize, factor: usize, fill: f32) -> Vec<f32> {
    let mx = nx.div_ceil(factor);
    let my = ny.div_ceil(factor);
    let mut out = vec![fill; mx * my];

    out.par_chunks_mut(mx).enumerate().for_each(|(bj, row)| {
        for (bi, cell) in row.iter_mut().enumerate() {
            let mut sum = 0.0f64;
            let mut poisoned = false;

            'block: for dy in 0..factor {
                let sy = (bj * factor + dy).min(ny - 1);
                for dx in 0..factor {
                    let sx = (bi * factor + dx).min(nx - 1);
                    let v = src[sy * nx + sx];
                    if is_fill(v, fill) {
                        poisoned = true;
                        break 'block;
                    }
                    sum += v as f64;
                }
            }

            if !poisoned {
                *cell = (sum / (factor * factor) as f64) as f32;
            }
        }
    });

    out
}

/// Contract by block mode: the most frequent value after rounding to the
/// nearest integer, with the first-seen value winning ties.
pub fn reduce_mode(src: &[f32], nx: usize, ny: usize, factor: usize, fill: f32) -> Vec<f32> {
    let mx = nx.div_ceil(factor);
    let my = ny.div_ceil(factor);
    let mut out = vec![fill; mx * my];

    out.par_chunks_mut(mx).enumerate().for_each(|(bj, row)| {
        // (rounded value, count) in first-seen order.
        let mut counts: Vec<(i64, usize)> = Vec::with_capacity(factor * factor);

        for (bi, cell) in row.iter_mut().enumerate() {
            counts.clear();
            let mut poisoned = false;

            'block: for dy in 0..factor {
                let sy = (bj * factor + dy).min(ny - 1);
                for dx in 0..factor {
                    let sx = (bi * factor + dx).min(nx - 1);
                    let v = src[sy * nx + sx];
                    if is_fill(v, fill) {
                        poisoned = true;
                        break 'block;
                    }
                    let key = v.round() as i64;
                    match counts.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, n)) => *n += 1,
                        None => counts.push((key, 1)),
                    }
                }
            }

            if !poisoned {
                // Strict > keeps the earliest-seen value on ties.
                let mut best = counts[0];
                for &(key, n) in &counts[1..] {
                    if n > best.1 {
                        best = (key, n);
                    }
                }
                *cell = best.0 as f32;
            }
        }
    });

    out
}
