//! Overlay masks.
//!
//! A mask is a boolean grid shaped like the unscaled data slice, marking
//! the cells covered by overlay points. It is rebuilt whenever the overlay
//! source, the displayed variable, or the slice shape changes, and burned
//! into the raw slice before resampling.

use view_common::ViewResult;

use crate::geolocate::{nearest_index_1d, Geolocator};

/// Boolean grid marking overlay-covered cells.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayMask {
    cells: Vec<bool>,
    pub width: usize,
    pub height: usize,
}

impl OverlayMask {
    /// An empty mask of the given shape.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            cells: vec![false; width * height],
            width,
            height,
        }
    }

    /// Build a mask from points over separable axes: independent nearest
    /// scans along the X and Y coordinate arrays.
    pub fn from_separable(
        points: &[(f64, f64)],
        x_coords: &[f64],
        y_coords: &[f64],
    ) -> Self {
        let mut mask = Self::empty(x_coords.len(), y_coords.len());
        for &(x, y) in points {
            let i = nearest_index_1d(x_coords, x);
            let j = nearest_index_1d(y_coords, y);
            mask.cells[j * mask.width + i] = true;
        }
        mask
    }

    /// Build a mask from points over curvilinear 2-D coordinate fields,
    /// locating each point with the steepest-descent search.
    pub fn from_curvilinear(
        points: &[(f64, f64)],
        coord_x: &[f64],
        coord_y: &[f64],
        width: usize,
        height: usize,
        locator: &mut Geolocator,
    ) -> ViewResult<Self> {
        let mut mask = Self::empty(width, height);
        for &point in points {
            let (i, j) = locator.locate(point, coord_x, coord_y, width, height)?;
            mask.cells[j * width + i] = true;
        }
        Ok(mask)
    }

    /// Whether a cell is marked.
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        self.cells
            .get(row * self.width + col)
            .copied()
            .unwrap_or(false)
    }

    /// Number of marked cells.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Stamp `value` into every marked cell of a raw slice of the same
    /// shape.
    pub fn burn(&self, data: &mut [f32], value: f32) {
        for (cell, &marked) in data.iter_mut().zip(&self.cells) {
            if marked {
                *cell = value;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_separable_marks_nearest_cell() {
        let x_coords = [0.0, 10.0, 20.0, 30.0];
        let y_coords = [0.0, 5.0, 10.0];
        let mask = OverlayMask::from_separable(&[(11.0, 4.0)], &x_coords, &y_coords);
        assert_eq!(mask.count(), 1);
        assert!(mask.is_set(1, 1));
    }

    #[test]
    fn test_burn_stamps_only_marked_cells() {
        let x_coords = [0.0, 1.0, 2.0];
        let y_coords = [0.0, 1.0];
        let mask = OverlayMask::from_separable(&[(2.0, 0.0)], &x_coords, &y_coords);

        let mut data = vec![1.0f32; 6];
        mask.burn(&mut data, -999.0);
        assert_eq!(data, vec![1.0, 1.0, -999.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_duplicate_points_mark_once() {
        let x_coords = [0.0, 1.0];
        let y_coords = [0.0, 1.0];
        let mask =
            OverlayMask::from_separable(&[(0.0, 0.0), (0.1, 0.1), (0.2, 0.0)], &x_coords, &y_coords);
        assert_eq!(mask.count(), 1);
    }
}
