//! Block expansion: replicate and bilinear.
//!
//! Bilinear expansion works on a placed-point grid: each source cell's
//! exact value lands at the sub-cell offset floor((N-1)/2) of its
//! destination block, intermediate grid lines are interpolated along rows
//! and columns between adjacent placed points, and the remaining interior
//! is the missing-aware average of the row and column estimates. The
//! half-block margin outside the placed points is extrapolated from the
//! nearest interior gradient (damped), the corner half-blocks are filled
//! flat, and blocks whose source cell is fill are re-stamped uniformly with
//! fill at the end, overriding any interpolation leakage.

use view_common::is_fill;

/// Expand by replication: every destination cell takes its source block's
/// value.
pub fn expand_replicate(src: &[f32], nx: usize, ny: usize, factor: usize) -> Vec<f32> {
    let mx = nx * factor;
    let my = ny * factor;
    let mut out = vec![0.0f32; mx * my];

    for j in 0..ny {
        for i in 0..nx {
            let v = src[j * nx + i];
            for dy in 0..factor {
                let row = (j * factor + dy) * mx + i * factor;
                out[row..row + factor].fill(v);
            }
        }
    }

    out
}

/// Interpolate between two endpoints, propagating the fill sentinel: a fill
/// endpoint yields the other endpoint's value for the whole run, two fill
/// endpoints stay fill.
fn lerp_fill(a: f32, b: f32, t: f32, fill: f32) -> f32 {
    let a_missing = is_fill(a, fill);
    let b_missing = is_fill(b, fill);
    if a_missing && b_missing {
        fill
    } else if a_missing {
        b
    } else if b_missing {
        a
    } else {
        a + (b - a) * t
    }
}

/// Average two estimates, using whichever is valid when the other is fill.
fn mean_fill(a: f32, b: f32, fill: f32) -> f32 {
    let a_missing = is_fill(a, fill);
    let b_missing = is_fill(b, fill);
    if a_missing && b_missing {
        fill
    } else if a_missing {
        b
    } else if b_missing {
        a
    } else {
        (a + b) / 2.0
    }
}

/// Expand by bilinear interpolation between placed source points.
pub fn expand_bilinear(
    src: &[f32],
    nx: usize,
    ny: usize,
    factor: usize,
    fill: f32,
    edge_damping: f32,
) -> Vec<f32> {
    let mx = nx * factor;
    let my = ny * factor;
    let offset = (factor - 1) / 2;
    // Placed-point positions of the first and last source cells.
    let last_px = (nx - 1) * factor + offset;
    let last_py = (ny - 1) * factor + offset;

    let mut out = vec![fill; mx * my];
    let px = |i: usize| i * factor + offset;
    let py = |j: usize| j * factor + offset;

    // Exact source values at the placed points.
    for j in 0..ny {
        for i in 0..nx {
            out[py(j) * mx + px(i)] = src[j * nx + i];
        }
    }

    // Grid lines along rows: interpolate between horizontally adjacent
    // placed points.
    for j in 0..ny {
        let y = py(j);
        for i in 0..nx.saturating_sub(1) {
            let a = src[j * nx + i];
            let b = src[j * nx + i + 1];
            for t in 1..factor {
                let x = px(i) + t;
                out[y * mx + x] = lerp_fill(a, b, t as f32 / factor as f32, fill);
            }
        }
    }

    // Grid lines along columns.
    for i in 0..nx {
        let x = px(i);
        for j in 0..ny.saturating_sub(1) {
            let a = src[j * nx + i];
            let b = src[(j + 1) * nx + i];
            for t in 1..factor {
                let y = py(j) + t;
                out[y * mx + x] = lerp_fill(a, b, t as f32 / factor as f32, fill);
            }
        }
    }

    // Interior cells between grid lines: average of the estimate carried
    // down the columns (from the row-interpolated lines) and the estimate
    // carried across the rows (from the column-interpolated lines).
    for j in 0..ny.saturating_sub(1) {
        for i in 0..nx.saturating_sub(1) {
            for ty in 1..factor {
                let y = py(j) + ty;
                let fy = ty as f32 / factor as f32;
                for tx in 1..factor {
                    let x = px(i) + tx;
                    let fx = tx as f32 / factor as f32;

                    let from_rows = lerp_fill(
                        out[py(j) * mx + x],
                        out[py(j + 1) * mx + x],
                        fy,
                        fill,
                    );
                    let from_cols = lerp_fill(
                        out[y * mx + px(i)],
                        out[y * mx + px(i + 1)],
                        fx,
                        fill,
                    );
                    out[y * mx + x] = mean_fill(from_rows, from_cols, fill);
                }
            }
        }
    }

    // Half-block margins: extend the nearest interior gradient outward,
    // damped. The rows/columns between the first and last placed lines all
    // have interior values at this point.
    for y in offset..=last_py {
        // Left margin.
        if nx >= 2 {
            let v0 = out[y * mx + offset];
            let v1 = out[y * mx + offset + 1];
            for x in 0..offset {
                out[y * mx + x] = extrapolate(v0, v1, (offset - x) as f32, edge_damping, fill);
            }
            // Right margin.
            let v0 = out[y * mx + last_px];
            let v1 = out[y * mx + last_px - 1];
            for x in (last_px + 1)..mx {
                out[y * mx + x] = extrapolate(v0, v1, (x - last_px) as f32, edge_damping, fill);
            }
        }
    }
    for x in offset..=last_px {
        // Top margin.
        if ny >= 2 {
            let v0 = out[offset * mx + x];
            let v1 = out[(offset + 1) * mx + x];
            for y in 0..offset {
                out[y * mx + x] = extrapolate(v0, v1, (offset - y) as f32, edge_damping, fill);
            }
            // Bottom margin.
            let v0 = out[last_py * mx + x];
            let v1 = out[(last_py - 1) * mx + x];
            for y in (last_py + 1)..my {
                out[y * mx + x] = extrapolate(v0, v1, (y - last_py) as f32, edge_damping, fill);
            }
        }
    }

    // Degenerate single-row/column sources have no gradient to extend;
    // replicate the placed line instead.
    if ny == 1 {
        let line: Vec<f32> = out[py(0) * mx..(py(0) + 1) * mx].to_vec();
        for y in (0..my).filter(|&y| y != py(0)) {
            out[y * mx..(y + 1) * mx].copy_from_slice(&line);
        }
    }
    if nx == 1 {
        for y in 0..my {
            let v = out[y * mx + px(0)];
            out[y * mx..(y + 1) * mx].fill(v);
        }
    }

    // Corner half-blocks: flat value of the nearest source corner.
    let corners = [
        (0..offset, 0..offset, src[0]),
        ((last_px + 1)..mx, 0..offset, src[nx - 1]),
        (0..offset, (last_py + 1)..my, src[(ny - 1) * nx]),
        ((last_px + 1)..mx, (last_py + 1)..my, src[ny * nx - 1]),
    ];
    for (xs, ys, v) in corners {
        for y in ys {
            for x in xs.clone() {
                out[y * mx + x] = v;
            }
        }
    }

    // Blocks whose source cell is fill become uniformly fill, overriding
    // any interpolation leakage from their neighbors.
    for j in 0..ny {
        for i in 0..nx {
            if is_fill(src[j * nx + i], fill) {
                for dy in 0..factor {
                    let row = (j * factor + dy) * mx + i * factor;
                    out[row..row + factor].fill(fill);
                }
            }
        }
    }

    out
}

/// Extend a value outward from the edge along the damped nearest-interior
/// gradient.
fn extrapolate(edge: f32, inner: f32, distance: f32, damping: f32, fill: f32) -> f32 {
    if is_fill(edge, fill) {
        fill
    } else if is_fill(inner, fill) {
        edge
    } else {
        edge + (edge - inner) * damping * distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: f32 = -999.0;

    #[test]
    fn test_replicate_blocks() {
        let src = vec![1.0, 2.0, 3.0, 4.0];
        let out = expand_replicate(&src, 2, 2, 2);
        assert_eq!(
            out,
            vec![
                1.0, 1.0, 2.0, 2.0, //
                1.0, 1.0, 2.0, 2.0, //
                3.0, 3.0, 4.0, 4.0, //
                3.0, 3.0, 4.0, 4.0,
            ]
        );
    }

    #[test]
    fn test_bilinear_places_exact_values() {
        let src = vec![1.0, 2.0, 3.0, 4.0];
        let out = expand_bilinear(&src, 2, 2, 3, FILL, 0.2);
        // offset = 1: source values land at (1,1), (4,1), (1,4), (4,4)
        assert_eq!(out[1 * 6 + 1], 1.0);
        assert_eq!(out[1 * 6 + 4], 2.0);
        assert_eq!(out[4 * 6 + 1], 3.0);
        assert_eq!(out[4 * 6 + 4], 4.0);
    }

    #[test]
    fn test_bilinear_grid_line_interpolation() {
        let src = vec![0.0, 3.0, 0.0, 3.0];
        let out = expand_bilinear(&src, 2, 2, 3, FILL, 0.2);
        // Between placed points (1,1)=0 and (4,1)=3: thirds.
        assert!((out[1 * 6 + 2] - 1.0).abs() < 1e-6);
        assert!((out[1 * 6 + 3] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_bilinear_fill_endpoint_takes_other_value() {
        let src = vec![5.0, FILL];
        let out = expand_bilinear(&src, 2, 1, 3, FILL, 0.2);
        // Run between the valid and the fill endpoint takes the valid
        // value, but the fill source block is re-stamped at the end.
        // Placed row is y = 1 (offset 1), width is 6.
        assert_eq!(out[6 + 2], 5.0);
        assert_eq!(out[6 + 3], FILL);
    }

    #[test]
    fn test_lerp_fill_rules() {
        assert_eq!(lerp_fill(FILL, FILL, 0.5, FILL), FILL);
        assert_eq!(lerp_fill(FILL, 7.0, 0.5, FILL), 7.0);
        assert_eq!(lerp_fill(7.0, FILL, 0.5, FILL), 7.0);
        assert!((lerp_fill(0.0, 10.0, 0.3, FILL) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_extrapolate_damping() {
        // gradient (edge - inner) = 2, damping 0.2, distance 1 -> edge + 0.4
        let v = extrapolate(10.0, 8.0, 1.0, 0.2, FILL);
        assert!((v - 10.4).abs() < 1e-6);
        assert_eq!(extrapolate(FILL, 8.0, 1.0, 0.2, FILL), FILL);
        assert_eq!(extrapolate(10.0, FILL, 1.0, 0.2, FILL), 10.0);
    }
}
