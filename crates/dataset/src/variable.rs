//! The aggregate variable model and the virtual dataset addressor.

use std::rc::Rc;

use view_common::{ViewError, ViewResult};

use crate::chain::FileChain;
use crate::dimension::Dimension;
use crate::mapping::CoordMapping;

/// A logical array over N dimensions, possibly concatenated along
/// dimension 0 across several physical files.
pub struct Variable {
    /// Variable name.
    pub name: String,
    /// Aggregate per-dimension extents; `shape[0]` sums the per-file
    /// extents along the concatenation axis.
    pub shape: Vec<usize>,
    /// Dimension names, in storage order.
    pub dim_names: Vec<String>,
    /// Shared dimension handles, same order as `dim_names`.
    pub dims: Vec<Rc<Dimension>>,
    /// Fill sentinel.
    pub fill_value: f32,
    /// Ordered file chain; owns the per-file read handles.
    pub chain: FileChain,
    /// Optional coordinate-mapping descriptor per dimension.
    pub mappings: Vec<Option<CoordMapping>>,
}

impl Variable {
    /// Number of dimensions.
    pub fn ndims(&self) -> usize {
        self.shape.len()
    }

    /// Whether this variable spans more than one file.
    pub fn is_virtual(&self) -> bool {
        self.chain.len() > 1
    }

    /// Total number of cells.
    pub fn aggregate_size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Translate a virtual index vector into (file ordinal, local index
    /// vector). Only dimension 0 may differ between the virtual and local
    /// vectors; every other component passes through unchanged.
    pub fn translate_index(&self, virtual_index: &[usize]) -> ViewResult<(usize, Vec<usize>)> {
        let (ordinal, local0) = self.chain.translate(virtual_index[0])?;
        let mut local = virtual_index.to_vec();
        local[0] = local0;
        Ok((ordinal, local))
    }

    /// Read a hyperslab in virtual coordinates, stitching across file
    /// boundaries when the requested range along dimension 0 spans more
    /// than one file.
    ///
    /// Records are contiguous runs in storage order (dimension 0 is
    /// slowest-varying), so per-file sub-reads concatenate directly.
    pub fn read_hyperslab(&self, start: &[usize], count: &[usize]) -> ViewResult<Vec<f32>> {
        let record_cells: usize = count[1..].iter().product::<usize>().max(1);
        let mut out = Vec::with_capacity(count[0] * record_cells);

        let mut remaining = count[0];
        let mut cursor = start[0];
        while remaining > 0 {
            let (ordinal, local0) = self.chain.translate(cursor)?;
            let slab = self.chain.get(ordinal).ok_or_else(|| {
                ViewError::ReadFailed(format!("missing file {} for '{}'", ordinal, self.name))
            })?;
            let take = remaining.min(slab.extent0 - local0);

            let mut local_start = start.to_vec();
            local_start[0] = local0;
            let mut local_count = count.to_vec();
            local_count[0] = take;

            let part = slab
                .reader
                .read_hyperslab(&self.name, &local_start, &local_count)?;
            out.extend_from_slice(&part);

            cursor += take;
            remaining -= take;
        }

        Ok(out)
    }

    /// Read one full frame at a given index along dimension 0.
    pub fn read_frame(&self, frame: usize) -> ViewResult<Vec<f32>> {
        let mut start = vec![0usize; self.ndims()];
        start[0] = frame;
        let mut count = self.shape.clone();
        count[0] = 1;
        self.read_hyperslab(&start, &count)
    }

    /// Pick up growth of the trailing file along the record axis.
    pub fn refresh_extent(&mut self) -> ViewResult<()> {
        let total = self.chain.refresh_trailing_extent()?;
        self.shape[0] = total;
        Ok(())
    }
}
