//! The view orchestrator.
//!
//! Owns the dataset, the single current view, and the read -> overlay
//! burn-in -> resample -> publish pipeline. All engine state lives in this
//! explicit context object; operations take `&mut self` and report typed
//! errors at the boundary.

use std::cell::Cell;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use lru::LruCache;
use tracing::debug;

use dataset::{
    estimate_range, CoordMapping, Coordinate, CoordinateResolver, Dataset, UnitsConverter,
    Variable,
};
use overlay::{load_overlay_file, Geolocator, OverlayMask};
use resample::{resample, ResampleOptions};
use view_common::{Slice2d, ViewError, ViewResult};

use crate::config::ViewConfig;
use crate::pixels::{map_pixels, widen_degenerate};
use crate::presenter::{LabelKind, Presenter};
use crate::view::{step_magnification, AxisRole, ChangeUnit, DataStatus, View};

/// Orchestrator lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    NoVariable,
    VariableSelected,
    AxesChosen,
    DataLoaded,
    DataStale,
    DataEdited,
}

/// Where overlay points come from.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlaySource {
    None,
    /// Points supplied directly by the caller (e.g. a built-in coastline
    /// set owned by the presentation layer).
    Points(Vec<(f64, f64)>),
    /// A custom overlay point file.
    File(PathBuf),
}

/// The engine context: dataset, current view, caches, and collaborators.
pub struct Orchestrator {
    dataset: Dataset,
    config: ViewConfig,
    resolver: CoordinateResolver,
    geolocator: Geolocator,
    units_converter: Option<Box<dyn UnitsConverter>>,

    state: ViewState,
    view: Option<View>,

    overlay_source: OverlaySource,
    overlay_points: Vec<(f64, f64)>,
    overlay_mask: Option<OverlayMask>,

    /// Re-entrancy guard: a redraw triggered while one is executing is a
    /// silent no-op.
    busy: Cell<bool>,
    /// Rendered frames for the current configuration, keyed by scan index.
    frame_cache: LruCache<usize, (Vec<u8>, usize, usize)>,
}

impl Orchestrator {
    pub fn new(dataset: Dataset, config: ViewConfig) -> Self {
        let cache_size =
            NonZeroUsize::new(config.frame_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            geolocator: Geolocator::new(config.geolocator_incremental),
            frame_cache: LruCache::new(cache_size),
            dataset,
            config,
            resolver: CoordinateResolver::new(),
            units_converter: None,
            state: ViewState::NoVariable,
            view: None,
            overlay_source: OverlaySource::None,
            overlay_points: Vec::new(),
            overlay_mask: None,
            busy: Cell::new(false),
        }
    }

    /// Install the units-conversion collaborator.
    pub fn set_units_converter(&mut self, converter: Box<dyn UnitsConverter>) {
        self.units_converter = Some(converter);
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    // ========================================================================
    // Variable and axis selection
    // ========================================================================

    /// Display a variable. Axis roles and index positions are inherited
    /// from the previously displayed variable where dimension names match
    /// (requiring identical file chains when a name alone is ambiguous);
    /// otherwise the trailing dimensions become X/Y and the leading one the
    /// scan axis.
    pub fn set_scan_variable(&mut self, name: &str) -> ViewResult<()> {
        let var = self
            .dataset
            .variable(name)
            .ok_or_else(|| ViewError::VariableNotFound(name.to_string()))?;
        let ndims = var.ndims();
        self.state = ViewState::VariableSelected;

        let previous = self.view.take();
        let inherited = previous
            .as_ref()
            .and_then(|old| self.inherit_axes(old, var));

        let (scan_axis, y_axis, x_axis) = inherited.unwrap_or_else(|| default_axes(ndims));

        let mut index = vec![0usize; ndims];
        if let Some(old) = &previous {
            if let Some(old_var) = self.dataset.variable(&old.variable) {
                for (dim, name) in var.dim_names.iter().enumerate() {
                    if let Some(old_dim) =
                        old_var.dim_names.iter().position(|n| n == name)
                    {
                        index[dim] = old.index[old_dim].min(var.shape[dim].saturating_sub(1));
                    }
                }
            }
        }

        self.view = Some(View::new(
            name,
            ndims,
            scan_axis,
            y_axis,
            x_axis,
            index,
            self.config.history_size,
        ));
        self.overlay_mask = None;
        self.frame_cache.clear();
        self.state = ViewState::AxesChosen;
        debug!(variable = name, scan_axis, y_axis, x_axis, "variable selected");
        Ok(())
    }

    fn inherit_axes(&self, old: &View, var: &Variable) -> Option<(usize, usize, usize)> {
        let old_var = self.dataset.variable(&old.variable)?;
        let find = |old_axis: usize| -> Option<usize> {
            let name = &old_var.dim_names[old_axis];
            let matches: Vec<usize> = var
                .dim_names
                .iter()
                .enumerate()
                .filter(|(_, n)| *n == name)
                .map(|(i, _)| i)
                .collect();
            match matches.len() {
                1 => Some(matches[0]),
                0 => None,
                // A name alone cannot disambiguate; accept only when the
                // file chains are identical.
                _ if var.chain.fingerprint() == old_var.chain.fingerprint() => {
                    Some(matches[0])
                }
                _ => None,
            }
        };
        let scan = find(old.scan_axis)?;
        let y = find(old.y_axis)?;
        let x = find(old.x_axis)?;
        Some((scan, y, x))
    }

    /// Reassign a display role to a named dimension. When the dimension
    /// already serves another role, the two roles swap. Loaded data goes
    /// stale and rendered frames for the old configuration are dropped.
    pub fn set_axis(&mut self, role: AxisRole, dim_name: &str) -> ViewResult<()> {
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        if view.status == DataStatus::Edited {
            return Err(ViewError::EditsPending(view.variable.clone()));
        }
        let var = self
            .dataset
            .variable(&view.variable)
            .ok_or_else(|| ViewError::VariableNotFound(view.variable.clone()))?;
        let position = var
            .dim_names
            .iter()
            .position(|n| n == dim_name)
            .ok_or_else(|| ViewError::DimensionNotFound(dim_name.to_string()))?;

        let view = self.view.as_mut().unwrap();
        let old = match role {
            AxisRole::Scan => view.scan_axis,
            AxisRole::Y => view.y_axis,
            AxisRole::X => view.x_axis,
        };
        // Swap with whichever role currently holds the target dimension.
        if view.scan_axis == position {
            view.scan_axis = old;
        } else if view.y_axis == position {
            view.y_axis = old;
        } else if view.x_axis == position {
            view.x_axis = old;
        }
        match role {
            AxisRole::Scan => view.scan_axis = position,
            AxisRole::Y => view.y_axis = position,
            AxisRole::X => view.x_axis = position,
        }

        view.status = DataStatus::Invalid;
        view.raw.clear();
        view.pixels.clear();
        self.overlay_mask = None;
        self.frame_cache.clear();
        self.state = ViewState::DataStale;
        Ok(())
    }

    /// Move the scan position by whole frames or by percent of the scan
    /// extent, clamped at both ends.
    pub fn change_view(&mut self, delta: i64, unit: ChangeUnit) -> ViewResult<()> {
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        if view.status == DataStatus::Edited {
            return Err(ViewError::EditsPending(view.variable.clone()));
        }
        let var = self
            .dataset
            .variable(&view.variable)
            .ok_or_else(|| ViewError::VariableNotFound(view.variable.clone()))?;
        let extent = var.shape[view.scan_axis] as i64;

        let frames = match unit {
            ChangeUnit::Frames => delta,
            ChangeUnit::Percent => (delta as f64 / 100.0 * extent as f64).round() as i64,
        };

        let view = self.view.as_mut().unwrap();
        let current = view.index[view.scan_axis] as i64;
        let target = (current + frames).clamp(0, extent - 1) as usize;
        if target != view.index[view.scan_axis] {
            view.index[view.scan_axis] = target;
            if view.status == DataStatus::Valid {
                view.status = DataStatus::Invalid;
            }
            self.state = ViewState::DataStale;
        }
        Ok(())
    }

    // ========================================================================
    // Loading and rendering
    // ========================================================================

    /// Read the current slice through the file contract and burn the
    /// overlay in. Pending edits block the load until exported or
    /// discarded.
    pub fn load(&mut self) -> ViewResult<()> {
        let (variable, x_axis, y_axis, index) = {
            let view = self.view.as_ref().ok_or_else(|| {
                ViewError::VariableNotFound("no variable selected".to_string())
            })?;
            if view.status == DataStatus::Edited {
                return Err(ViewError::EditsPending(view.variable.clone()));
            }
            (
                view.variable.clone(),
                view.x_axis,
                view.y_axis,
                view.index.clone(),
            )
        };
        let var = self
            .dataset
            .variable(&variable)
            .ok_or_else(|| ViewError::VariableNotFound(variable.clone()))?;

        let nx = var.shape[x_axis];
        let ny = if y_axis == x_axis { 1 } else { var.shape[y_axis] };

        let mut start = index.clone();
        let mut count = vec![1usize; var.ndims()];
        start[x_axis] = 0;
        count[x_axis] = nx;
        if y_axis != x_axis {
            start[y_axis] = 0;
            count[y_axis] = ny;
        }

        let data = var.read_hyperslab(&start, &count)?;
        // Hyperslabs come back in storage order; a transposed axis choice
        // (X before Y) needs reordering into ny rows of nx columns.
        let mut raw = if y_axis <= x_axis {
            data
        } else {
            let mut t = vec![0.0f32; nx * ny];
            for (i, column) in data.chunks_exact(ny).enumerate() {
                for (j, &v) in column.iter().enumerate() {
                    t[j * nx + i] = v;
                }
            }
            t
        };

        if self.overlay_source != OverlaySource::None {
            let stale = self
                .overlay_mask
                .as_ref()
                .map(|m| m.width != nx || m.height != ny)
                .unwrap_or(true);
            if stale {
                self.overlay_mask = Some(build_mask(
                    var,
                    x_axis,
                    y_axis,
                    &index,
                    nx,
                    ny,
                    &self.overlay_points,
                    &mut self.geolocator,
                )?);
            }
            if let Some(mask) = &self.overlay_mask {
                mask.burn(&mut raw, var.fill_value);
            }
        }

        let view = self.view.as_mut().unwrap();
        view.raw = Slice2d::new(raw, nx, ny);
        view.edits.clear();
        view.status = DataStatus::Valid;
        self.state = ViewState::DataLoaded;
        Ok(())
    }

    /// Run the full pipeline and publish the result. A re-entrant call
    /// while a redraw is in flight returns `Ok(false)` without doing any
    /// work.
    pub fn render(&mut self, presenter: &mut dyn Presenter) -> ViewResult<bool> {
        if self.busy.get() {
            debug!("redraw already in flight; ignoring re-entrant request");
            return Ok(false);
        }
        self.busy.set(true);
        let result = self.render_inner(presenter);
        self.busy.set(false);
        result.map(|_| true)
    }

    fn render_inner(&mut self, presenter: &mut dyn Presenter) -> ViewResult<()> {
        match self.state {
            ViewState::NoVariable | ViewState::VariableSelected => {
                return Err(ViewError::VariableNotFound(
                    "no variable selected".to_string(),
                ))
            }
            ViewState::AxesChosen | ViewState::DataStale => self.load()?,
            ViewState::DataLoaded | ViewState::DataEdited => {}
        }

        let (variable, scan_axis, scan_index, magnification, nx, ny, fill, edited) = {
            let view = self.view.as_ref().expect("loaded state implies a view");
            let var = self
                .dataset
                .variable(&view.variable)
                .ok_or_else(|| ViewError::VariableNotFound(view.variable.clone()))?;
            (
                view.variable.clone(),
                view.scan_axis,
                view.index[view.scan_axis],
                view.magnification,
                view.raw.nx,
                view.raw.ny,
                var.fill_value,
                view.status == DataStatus::Edited,
            )
        };

        if !edited {
            if let Some((pixels, w, h)) = self.frame_cache.get(&scan_index) {
                presenter.publish_pixels(pixels, *w, *h);
                let (pixels, w, h) = (pixels.clone(), *w, *h);
                let view = self.view.as_mut().unwrap();
                view.pixels = pixels;
                self.publish_labels(presenter, &variable, scan_axis, w, h)?;
                return Ok(());
            }
        }

        let (min, max) = match self.view.as_ref().unwrap().range {
            Some(range) => range,
            None => self.auto_range()?,
        };

        let opts = ResampleOptions {
            expand: self.config.expand_method,
            reduce: self.config.reduce_method,
            edge_damping: self.config.edge_damping,
        };
        let view = self.view.as_mut().unwrap();
        let (scaled, w, h) = resample(&view.raw.data, nx, ny, magnification, fill, &opts);
        let pixels = map_pixels(&scaled, fill, min, max);
        view.pixels = pixels.clone();
        if !edited {
            self.frame_cache.put(scan_index, (pixels.clone(), w, h));
        }

        presenter.publish_pixels(&pixels, w, h);
        self.publish_labels(presenter, &variable, scan_axis, w, h)?;
        Ok(())
    }

    fn publish_labels(
        &self,
        presenter: &mut dyn Presenter,
        variable: &str,
        scan_axis: usize,
        _width: usize,
        _height: usize,
    ) -> ViewResult<()> {
        presenter.update_label(LabelKind::Variable, variable);
        let coordinate = self.axis_coordinate(AxisRole::Scan);
        if let Ok(coordinate) = coordinate {
            presenter.update_label(LabelKind::ScanPosition, &coordinate.label);
        } else {
            // A scan axis without coordinates still has an index.
            let index = self.view.as_ref().map(|v| v.index[scan_axis]).unwrap_or(0);
            presenter.update_label(LabelKind::ScanPosition, &format!("frame {}", index));
        }
        if let Some((min, max)) = self.view.as_ref().and_then(|v| v.range) {
            presenter.update_label(LabelKind::Range, &format!("{} to {}", min, max));
        }
        Ok(())
    }

    // ========================================================================
    // Range control
    // ========================================================================

    /// Set the color range explicitly. A degenerate range is refused with a
    /// recoverable error; callers may widen it or fall back to auto-range.
    pub fn set_range(&mut self, min: f32, max: f32) -> ViewResult<()> {
        let view = self
            .view
            .as_mut()
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        if min >= max {
            return Err(ViewError::DegenerateRange(view.variable.clone()));
        }
        view.range = Some((min, max));
        self.frame_cache.clear();
        Ok(())
    }

    /// Estimate the range from the data at the configured scan density.
    /// A degenerate estimate widens symmetrically; an all-missing variable
    /// yields (0, 0), the "no known range" condition.
    pub fn auto_range(&mut self) -> ViewResult<(f32, f32)> {
        let variable = self
            .view
            .as_ref()
            .map(|v| v.variable.clone())
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        let var = self
            .dataset
            .variable(&variable)
            .ok_or_else(|| ViewError::VariableNotFound(variable.clone()))?;

        let estimate = estimate_range(var, self.config.scan_density)?;
        let (min, max) = estimate.resolve();
        let (min, max) = if estimate.found {
            widen_degenerate(min, max)
        } else {
            debug!(variable = %variable, "no valid cells; range unknown");
            (min, max)
        };

        let view = self.view.as_mut().unwrap();
        view.range = Some((min, max));
        self.frame_cache.clear();
        Ok((min, max))
    }

    // ========================================================================
    // Magnification
    // ========================================================================

    /// Step the signed magnification factor. Rendered frames belong to the
    /// old configuration and are dropped; the raw slice stays valid.
    pub fn set_magnification(&mut self, delta: i32) -> ViewResult<i32> {
        let view = self
            .view
            .as_mut()
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        view.magnification = step_magnification(view.magnification, delta);
        view.pixels.clear();
        self.frame_cache.clear();
        Ok(self.view.as_ref().unwrap().magnification)
    }

    // ========================================================================
    // Overlays
    // ========================================================================

    /// Select the overlay source. File sources are parsed here; a bad file
    /// reports a failure and leaves the current overlay unchanged.
    pub fn set_overlay(&mut self, source: OverlaySource) -> ViewResult<()> {
        let points = match &source {
            OverlaySource::None => Vec::new(),
            OverlaySource::Points(points) => points.clone(),
            OverlaySource::File(path) => load_overlay_file(path)?,
        };

        self.overlay_source = source;
        self.overlay_points = points;
        self.overlay_mask = None;
        self.geolocator.reset();
        self.frame_cache.clear();
        if let Some(view) = self.view.as_mut() {
            if view.status == DataStatus::Valid {
                view.status = DataStatus::Invalid;
                self.state = ViewState::DataStale;
            }
        }
        Ok(())
    }

    /// The current overlay mask, when one has been built.
    pub fn overlay_mask(&self) -> Option<&OverlayMask> {
        self.overlay_mask.as_ref()
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Change one cell of the loaded slice. The view moves to the edited
    /// state; the next load is refused until the edits are exported or
    /// discarded.
    pub fn edit_cell(&mut self, linear_index: usize, value: f32) -> ViewResult<()> {
        let scan_index = {
            let view = self.view.as_ref().ok_or_else(|| {
                ViewError::VariableNotFound("no variable selected".to_string())
            })?;
            if view.status == DataStatus::Invalid {
                return Err(ViewError::ReadFailed(
                    "no slice loaded to edit".to_string(),
                ));
            }
            if linear_index >= view.raw.len() {
                return Err(ViewError::ReadFailed(format!(
                    "edit index {} beyond slice of {} cells",
                    linear_index,
                    view.raw.len()
                )));
            }
            view.index[view.scan_axis]
        };

        let view = self.view.as_mut().unwrap();
        view.raw.data[linear_index] = value;
        view.edits.push((linear_index, value));
        view.status = DataStatus::Edited;
        self.state = ViewState::DataEdited;
        self.frame_cache.pop(&scan_index);
        Ok(())
    }

    /// Hand the accumulated edits to the caller and keep the edited slice
    /// as the valid data.
    pub fn export_edits(&mut self) -> Vec<(usize, f32)> {
        match self.view.as_mut() {
            Some(view) if view.status == DataStatus::Edited => {
                view.status = DataStatus::Valid;
                self.state = ViewState::DataLoaded;
                std::mem::take(&mut view.edits)
            }
            _ => Vec::new(),
        }
    }

    /// Throw the edits away; the next load re-reads the slice.
    pub fn discard_edits(&mut self) {
        if let Some(view) = self.view.as_mut() {
            if view.status == DataStatus::Edited {
                view.edits.clear();
                view.status = DataStatus::Invalid;
                self.state = ViewState::DataStale;
            }
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Coordinate range of a display axis, from the shared per-dimension
    /// cache. A zero-width range is a recoverable condition; callers
    /// usually fall back to index labelling.
    pub fn axis_range(&self, role: AxisRole) -> ViewResult<(f64, f64)> {
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        let var = self
            .dataset
            .variable(&view.variable)
            .ok_or_else(|| ViewError::VariableNotFound(view.variable.clone()))?;
        let axis = match role {
            AxisRole::Scan => view.scan_axis,
            AxisRole::Y => view.y_axis,
            AxisRole::X => view.x_axis,
        };
        let (min, max) = var.dims[axis].range()?;
        if min == max {
            return Err(ViewError::ZeroCoordinateRange(var.dim_names[axis].clone()));
        }
        Ok((min, max))
    }

    /// Resolve the coordinate at the current index of a display axis.
    pub fn axis_coordinate(&self, role: AxisRole) -> ViewResult<Coordinate> {
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        let var = self
            .dataset
            .variable(&view.variable)
            .ok_or_else(|| ViewError::VariableNotFound(view.variable.clone()))?;
        let axis = match role {
            AxisRole::Scan => view.scan_axis,
            AxisRole::Y => view.y_axis,
            AxisRole::X => view.x_axis,
        };
        self.resolver.resolve(
            var,
            axis,
            view.index[axis],
            &view.index,
            self.units_converter.as_deref(),
        )
    }

    /// Remember a companion-plot cell in the fixed-size history.
    pub fn remember_plot_cell(&mut self, col: usize, row: usize) {
        if let Some(view) = self.view.as_mut() {
            view.history.remember((col, row));
        }
    }

    /// Pick up growth of the displayed variable's record axis.
    pub fn refresh_scan_extent(&mut self) -> ViewResult<usize> {
        let variable = self
            .view
            .as_ref()
            .map(|v| v.variable.clone())
            .ok_or_else(|| ViewError::VariableNotFound("no variable selected".to_string()))?;
        let var = self
            .dataset
            .variable_mut(&variable)
            .ok_or_else(|| ViewError::VariableNotFound(variable))?;
        var.refresh_extent()?;
        Ok(var.shape[0])
    }
}

/// Default axis assignment: trailing dimensions are X and Y, the leading
/// one scans.
fn default_axes(ndims: usize) -> (usize, usize, usize) {
    match ndims {
        0 | 1 => (0, 0, 0),
        2 => (0, 0, 1),
        _ => (0, ndims - 2, ndims - 1),
    }
}

/// Build the overlay mask for the current slice shape: curvilinear search
/// when both image axes carry 2-D coordinate mappings, independent 1-D
/// scans otherwise.
#[allow(clippy::too_many_arguments)]
fn build_mask(
    var: &Variable,
    x_axis: usize,
    y_axis: usize,
    index: &[usize],
    nx: usize,
    ny: usize,
    points: &[(f64, f64)],
    geolocator: &mut Geolocator,
) -> ViewResult<OverlayMask> {
    let curvilinear = matches!(
        (&var.mappings[x_axis], &var.mappings[y_axis]),
        (
            Some(CoordMapping::Curvilinear(_)),
            Some(CoordMapping::Curvilinear(_))
        )
    ) && x_axis != y_axis;

    if curvilinear {
        let (x_map, y_map) = match (&var.mappings[x_axis], &var.mappings[y_axis]) {
            (
                Some(CoordMapping::Curvilinear(x_map)),
                Some(CoordMapping::Curvilinear(y_map)),
            ) => (x_map, y_map),
            _ => unreachable!("guarded above"),
        };
        let mut coord_x = Vec::with_capacity(nx * ny);
        let mut coord_y = Vec::with_capacity(nx * ny);
        let mut cell = index.to_vec();
        for j in 0..ny {
            cell[y_axis] = j;
            for i in 0..nx {
                cell[x_axis] = i;
                coord_x.push(x_map.value_at(&var.chain, &cell)?);
                coord_y.push(y_map.value_at(&var.chain, &cell)?);
            }
        }
        OverlayMask::from_curvilinear(points, &coord_x, &coord_y, nx, ny, geolocator)
    } else {
        let x_coords = var.dims[x_axis].values()?;
        let y_coords = if y_axis == x_axis {
            std::rc::Rc::new(vec![0.0])
        } else {
            var.dims[y_axis].values()?
        };
        Ok(OverlayMask::from_separable(points, &x_coords, &y_coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::RecordingPresenter;
    use test_utils::{create_axis, MemoryFile};

    #[test]
    fn test_default_axes() {
        assert_eq!(default_axes(1), (0, 0, 0));
        assert_eq!(default_axes(2), (0, 0, 1));
        assert_eq!(default_axes(3), (0, 1, 2));
        assert_eq!(default_axes(4), (0, 2, 3));
    }

    #[test]
    fn test_reentrant_render_is_a_silent_noop() {
        let file = MemoryFile::new("tiny.dat")
            .with_record_axis("time")
            .with_dim("time", create_axis(2, 0.0, 1.0))
            .with_dim("x", create_axis(3, 0.0, 1.0))
            .with_variable("v", &["time", "x"], vec![1.0; 6], -999.0)
            .build();
        let dataset = Dataset::open(vec![file]).unwrap();
        let mut orch = Orchestrator::new(dataset, ViewConfig::default());
        orch.set_scan_variable("v").unwrap();

        // Simulate the host event loop pumping a second redraw request
        // while one is executing.
        orch.busy.set(true);
        let mut presenter = RecordingPresenter::default();
        assert!(!orch.render(&mut presenter).unwrap());
        assert!(presenter.frames.is_empty());

        orch.busy.set(false);
        assert!(orch.render(&mut presenter).unwrap());
        assert_eq!(presenter.frames.len(), 1);
    }
}
