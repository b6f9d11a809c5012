//! Nearest-cell search on coordinate grids.
//!
//! The curvilinear search exploits unimodality of squared coordinate
//! distance over the grid (true for geographic coordinates away from
//! antipodal degeneracies): steepest descent over a 3x3 window converges
//! to the global nearest cell without scanning the grid. Both axes wrap
//! toroidally; a search that wraps an axis more than twice is chasing a
//! target the grid does not contain and is abandoned.

use tracing::debug;
use view_common::{ViewError, ViewResult};

/// Sentinel cell returned when a search is abandoned.
const ABANDONED: (usize, usize) = (0, 0);

/// Allowed wraps per axis within one search.
const MAX_WRAPS: u32 = 2;

/// Stateful nearest-cell locator for curvilinear coordinate grids.
///
/// Seeded with the previous call's result: consecutive overlay points
/// (coastline vertices, trajectory samples) are typically close together,
/// so the window rarely travels far. The first search of a session starts
/// from the grid center.
pub struct Geolocator {
    /// Recompute only newly exposed window cells when shifting (true), or
    /// the full 3x3 window every step (false).
    incremental: bool,
    last_hit: Option<(usize, usize)>,
}

impl Geolocator {
    pub fn new(incremental: bool) -> Self {
        Self {
            incremental,
            last_hit: None,
        }
    }

    /// Forget the previous hit (e.g. when the overlay source changes).
    pub fn reset(&mut self) {
        self.last_hit = None;
    }

    /// Find the grid cell whose coordinates are nearest to `target`.
    ///
    /// `coord_x` and `coord_y` are full width*height coordinate fields in
    /// row-major order. Returns (col, row); on an abandoned search, cell
    /// (0, 0). A distance increase between steps means the unimodality
    /// precondition failed, reported as a fatal error rather than a wrong
    /// answer.
    pub fn locate(
        &mut self,
        target: (f64, f64),
        coord_x: &[f64],
        coord_y: &[f64],
        width: usize,
        height: usize,
    ) -> ViewResult<(usize, usize)> {
        let dist2 = |i: usize, j: usize| -> f64 {
            let dx = coord_x[j * width + i] - target.0;
            let dy = coord_y[j * width + i] - target.1;
            dx * dx + dy * dy
        };

        let (mut ci, mut cj) = self.last_hit.unwrap_or((width / 2, height / 2));
        let mut window = [[0.0f64; 3]; 3];
        fill_window(&mut window, ci, cj, width, height, &dist2);

        let mut wraps_x = 0u32;
        let mut wraps_y = 0u32;
        let mut step = 0usize;

        loop {
            step += 1;

            // Window minimum; ties prefer the center so convergence stops.
            let mut best = (1usize, 1usize);
            let mut best_d = window[1][1];
            for wj in 0..3 {
                for wi in 0..3 {
                    if window[wj][wi] < best_d {
                        best_d = window[wj][wi];
                        best = (wi, wj);
                    }
                }
            }

            if best == (1, 1) {
                self.last_hit = Some((ci, cj));
                return Ok((ci, cj));
            }

            let prev_center = window[1][1];
            if best_d > prev_center {
                return Err(ViewError::UnimodalityBroken {
                    step,
                    previous: prev_center,
                    current: best_d,
                });
            }

            // Shift toward the minimum, counting toroidal wraps.
            let di = best.0 as isize - 1;
            let dj = best.1 as isize - 1;
            let ni = wrap(ci, di, width);
            let nj = wrap(cj, dj, height);
            if (di < 0 && ni > ci) || (di > 0 && ni < ci) {
                wraps_x += 1;
            }
            if (dj < 0 && nj > cj) || (dj > 0 && nj < cj) {
                wraps_y += 1;
            }
            if wraps_x > MAX_WRAPS || wraps_y > MAX_WRAPS {
                debug!(
                    wraps_x = wraps_x,
                    wraps_y = wraps_y,
                    "geolocation wrapped too often; abandoning search"
                );
                self.last_hit = None;
                return Ok(ABANDONED);
            }
            ci = ni;
            cj = nj;

            if self.incremental {
                shift_window(&mut window, di, dj, ci, cj, width, height, &dist2);
            } else {
                fill_window(&mut window, ci, cj, width, height, &dist2);
            }
        }
    }
}

fn wrap(base: usize, delta: isize, extent: usize) -> usize {
    (base as isize + delta).rem_euclid(extent as isize) as usize
}

fn fill_window<F: Fn(usize, usize) -> f64>(
    window: &mut [[f64; 3]; 3],
    ci: usize,
    cj: usize,
    width: usize,
    height: usize,
    dist2: &F,
) {
    for (wj, row) in window.iter_mut().enumerate() {
        for (wi, cell) in row.iter_mut().enumerate() {
            let i = wrap(ci, wi as isize - 1, width);
            let j = wrap(cj, wj as isize - 1, height);
            *cell = dist2(i, j);
        }
    }
}

/// Slide the window by one step, carrying over the cells that stay inside
/// it and computing only the newly exposed ones.
#[allow(clippy::too_many_arguments)]
fn shift_window<F: Fn(usize, usize) -> f64>(
    window: &mut [[f64; 3]; 3],
    di: isize,
    dj: isize,
    ci: usize,
    cj: usize,
    width: usize,
    height: usize,
    dist2: &F,
) {
    let old = *window;
    for (wj, row) in window.iter_mut().enumerate() {
        for (wi, cell) in row.iter_mut().enumerate() {
            let oi = wi as isize + di;
            let oj = wj as isize + dj;
            if (0..3).contains(&oi) && (0..3).contains(&oj) {
                *cell = old[oj as usize][oi as usize];
            } else {
                let i = wrap(ci, wi as isize - 1, width);
                let j = wrap(cj, wj as isize - 1, height);
                *cell = dist2(i, j);
            }
        }
    }
}

/// Nearest index along a separable 1-D coordinate axis. Works for both
/// ascending and descending axes; ties keep the lower index.
pub fn nearest_index_1d(coords: &[f64], target: f64) -> usize {
    let mut best = 0usize;
    let mut best_d = f64::INFINITY;
    for (i, &c) in coords.iter().enumerate() {
        let d = (c - target).abs();
        if d < best_d {
            best_d = d;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Separable coordinate fields over a w x h grid: x = col, y = row.
    fn index_fields(w: usize, h: usize) -> (Vec<f64>, Vec<f64>) {
        let mut xs = Vec::with_capacity(w * h);
        let mut ys = Vec::with_capacity(w * h);
        for j in 0..h {
            for i in 0..w {
                xs.push(i as f64);
                ys.push(j as f64);
            }
        }
        (xs, ys)
    }

    #[test]
    fn test_locate_exact_cell() {
        let (xs, ys) = index_fields(10, 8);
        let mut loc = Geolocator::new(true);
        let hit = loc.locate((7.0, 3.0), &xs, &ys, 10, 8).unwrap();
        assert_eq!(hit, (7, 3));
    }

    #[test]
    fn test_locate_rounds_to_nearest() {
        let (xs, ys) = index_fields(10, 8);
        let mut loc = Geolocator::new(true);
        let hit = loc.locate((6.6, 2.2), &xs, &ys, 10, 8).unwrap();
        assert_eq!(hit, (7, 2));
    }

    #[test]
    fn test_locate_seeds_from_previous_hit() {
        let (xs, ys) = index_fields(20, 20);
        let mut loc = Geolocator::new(true);
        loc.locate((18.0, 18.0), &xs, &ys, 20, 20).unwrap();
        // Second search near the first converges from the remembered seed.
        let hit = loc.locate((17.0, 18.0), &xs, &ys, 20, 20).unwrap();
        assert_eq!(hit, (17, 18));
    }

    #[test]
    fn test_full_and_incremental_windows_agree() {
        let (xs, ys) = index_fields(16, 12);
        for target in [(0.2, 0.1), (15.0, 11.0), (8.4, 5.6), (3.0, 9.9)] {
            let mut a = Geolocator::new(true);
            let mut b = Geolocator::new(false);
            assert_eq!(
                a.locate(target, &xs, &ys, 16, 12).unwrap(),
                b.locate(target, &xs, &ys, 16, 12).unwrap()
            );
        }
    }

    #[test]
    fn test_nearest_index_ascending() {
        let coords = [0.0, 10.0, 20.0, 30.0];
        assert_eq!(nearest_index_1d(&coords, 10.0), 1);
        assert_eq!(nearest_index_1d(&coords, 13.0), 1);
        assert_eq!(nearest_index_1d(&coords, 17.0), 2);
        assert_eq!(nearest_index_1d(&coords, -5.0), 0);
        assert_eq!(nearest_index_1d(&coords, 99.0), 3);
    }

    #[test]
    fn test_nearest_index_descending() {
        let coords = [90.0, 60.0, 30.0, 0.0];
        assert_eq!(nearest_index_1d(&coords, 85.0), 0);
        assert_eq!(nearest_index_1d(&coords, 29.0), 2);
        assert_eq!(nearest_index_1d(&coords, -10.0), 3);
    }
}
