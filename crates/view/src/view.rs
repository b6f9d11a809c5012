//! Per-variable display state.

use serde::{Deserialize, Serialize};
use view_common::Slice2d;

/// Lifecycle of the loaded slice data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    /// No usable data in the buffers.
    Invalid,
    /// Buffers match the current index vector and axes.
    Valid,
    /// The user changed cell values; must be exported or discarded before
    /// the next load.
    Edited,
}

/// Which display role a dimension plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisRole {
    X,
    Y,
    Scan,
}

/// Unit of a scan-position change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeUnit {
    /// Whole frames along the scan axis.
    Frames,
    /// Percent of the scan extent.
    Percent,
}

/// Fixed-size ring of remembered companion-plot cells.
#[derive(Debug, Clone)]
pub struct PlotHistory {
    slots: Vec<(usize, usize)>,
    capacity: usize,
}

impl PlotHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember a cell, evicting the oldest entry when full.
    pub fn remember(&mut self, cell: (usize, usize)) {
        if self.slots.len() == self.capacity {
            self.slots.remove(0);
        }
        self.slots.push(cell);
    }

    /// Remembered cells, oldest first.
    pub fn cells(&self) -> &[(usize, usize)] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Display state for the currently shown variable.
///
/// Replaced wholesale when the displayed variable changes; the raw and
/// pixel buffers are reallocated whenever the axes or the magnification
/// change.
#[derive(Debug, Clone)]
pub struct View {
    /// Displayed variable name.
    pub variable: String,
    /// Dimension index serving as the scan axis.
    pub scan_axis: usize,
    /// Dimension index serving as the image Y axis.
    pub y_axis: usize,
    /// Dimension index serving as the image X axis.
    pub x_axis: usize,
    /// Full per-dimension index vector.
    pub index: Vec<usize>,
    /// Lifecycle of the raw buffer.
    pub status: DataStatus,
    /// Unscaled slice at source resolution.
    pub raw: Slice2d,
    /// Derived color-index buffer at display scale.
    pub pixels: Vec<u8>,
    /// Signed magnification factor.
    pub magnification: i32,
    /// Current color range, when established.
    pub range: Option<(f32, f32)>,
    /// Remembered companion-plot positions.
    pub history: PlotHistory,
    /// Cell edits applied to `raw` since the last load: (linear index,
    /// new value).
    pub edits: Vec<(usize, f32)>,
}

impl View {
    /// Fresh view for a variable with the given axis assignment.
    pub fn new(
        variable: &str,
        ndims: usize,
        scan_axis: usize,
        y_axis: usize,
        x_axis: usize,
        index: Vec<usize>,
        history_size: usize,
    ) -> Self {
        debug_assert_eq!(index.len(), ndims);
        Self {
            variable: variable.to_string(),
            scan_axis,
            y_axis,
            x_axis,
            index,
            status: DataStatus::Invalid,
            raw: Slice2d::new(Vec::new(), 0, 0),
            pixels: Vec::new(),
            magnification: 1,
            range: None,
            history: PlotHistory::new(history_size),
            edits: Vec::new(),
        }
    }

}

/// Step a signed magnification, skipping the hole between -2 and 1 (both
/// -1 and 0 would mean "less than one cell" and are silently capped).
pub fn step_magnification(current: i32, delta: i32) -> i32 {
    let mut m = current + delta;
    if (-1..=0).contains(&m) {
        m = if delta >= 0 { 1 } else { -2 };
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = PlotHistory::new(2);
        history.remember((1, 1));
        history.remember((2, 2));
        history.remember((3, 3));
        assert_eq!(history.cells(), &[(2, 2), (3, 3)]);
    }

    #[test]
    fn test_step_magnification_skips_identity_hole() {
        assert_eq!(step_magnification(1, 1), 2);
        assert_eq!(step_magnification(2, -1), 1);
        assert_eq!(step_magnification(1, -1), -2);
        assert_eq!(step_magnification(-2, 1), 1);
        assert_eq!(step_magnification(-2, -1), -3);
    }
}
