//! Coordinate-mapping descriptors.
//!
//! A dimension's true coordinate is sometimes read from another variable
//! rather than derived from the index. Two shapes exist: a scalar per file
//! (which may differ across a virtual concatenation) and a full 2-D
//! curvilinear field covering exactly two non-unit dimensions of the owning
//! variable. Both cache their reads append-only: a slot goes uncached ->
//! cached exactly once and is never invalidated.

use std::cell::{OnceCell, RefCell};
use std::rc::Rc;

use view_common::ViewResult;

use crate::chain::FileChain;

/// Coordinate descriptor attached to one dimension of a variable.
pub enum CoordMapping {
    /// One value per file in the chain.
    Scalar(ScalarMapping),
    /// One 2-D coordinate field shared by the whole variable.
    Curvilinear(CurvilinearMapping),
}

/// Scalar coordinate: the mapping variable holds a single value per file.
/// The value may differ between files of a virtual concatenation, so the
/// cache is keyed by file ordinal, not by index.
pub struct ScalarMapping {
    /// Name of the variable holding the coordinate value.
    pub coord_var: String,
    cache: RefCell<Vec<Option<f64>>>,
}

impl ScalarMapping {
    pub fn new(coord_var: String, chain_len: usize) -> Self {
        Self {
            coord_var,
            cache: RefCell::new(vec![None; chain_len]),
        }
    }

    /// Coordinate value for a file ordinal, read through the chain on first
    /// use and cached for the life of the variable.
    pub fn value(&self, chain: &FileChain, ordinal: usize) -> ViewResult<f64> {
        if let Some(Some(v)) = self.cache.borrow().get(ordinal) {
            return Ok(*v);
        }
        let slab = chain.get(ordinal).ok_or_else(|| {
            view_common::ViewError::ReadFailed(format!(
                "file ordinal {} beyond chain of '{}'",
                ordinal,
                chain.variable()
            ))
        })?;
        let ndims = slab.reader.dim_count(&self.coord_var)?;
        let start = vec![0usize; ndims];
        let count = vec![1usize; ndims];
        let cell = slab.reader.read_hyperslab(&self.coord_var, &start, &count)?;
        let value = cell.first().copied().unwrap_or(f32::NAN) as f64;
        self.cache.borrow_mut()[ordinal] = Some(value);
        Ok(value)
    }
}

/// Curvilinear 2-D coordinate field: one field read once per variable, plus
/// an index-place-factor vector converting an N-dimensional cell index into
/// a linear offset within the field.
pub struct CurvilinearMapping {
    /// Name of the variable holding the coordinate field.
    pub coord_var: String,
    /// Per-dimension factor of the owning variable: the field stride for
    /// dimensions the field covers, zero for the rest.
    pub place_factors: Vec<usize>,
    field: OnceCell<Rc<Vec<f64>>>,
}

impl CurvilinearMapping {
    pub fn new(coord_var: String, place_factors: Vec<usize>) -> Self {
        Self {
            coord_var,
            place_factors,
            field: OnceCell::new(),
        }
    }

    /// Linear offset of a cell within the coordinate field.
    pub fn offset(&self, full_index: &[usize]) -> usize {
        full_index
            .iter()
            .zip(&self.place_factors)
            .map(|(i, f)| i * f)
            .sum()
    }

    /// The cached coordinate field, read in full from the first file on
    /// first use. Curvilinear fields do not vary across a concatenation.
    pub fn field(&self, chain: &FileChain) -> ViewResult<Rc<Vec<f64>>> {
        if let Some(field) = self.field.get() {
            return Ok(Rc::clone(field));
        }
        let slab = chain.get(0).ok_or_else(|| {
            view_common::ViewError::ReadFailed(format!("empty chain for '{}'", chain.variable()))
        })?;
        let ndims = slab.reader.dim_count(&self.coord_var)?;
        let mut count = Vec::with_capacity(ndims);
        for dim in 0..ndims {
            count.push(slab.reader.dim_len(&self.coord_var, dim)?);
        }
        let start = vec![0usize; ndims];
        let raw = slab.reader.read_hyperslab(&self.coord_var, &start, &count)?;
        let field = Rc::new(raw.into_iter().map(|v| v as f64).collect::<Vec<f64>>());
        // Another borrow cannot have raced us in a single-threaded model;
        // set() only fails if the slot is already filled with this value.
        let _ = self.field.set(Rc::clone(&field));
        Ok(field)
    }

    /// Coordinate value of one cell.
    pub fn value_at(&self, chain: &FileChain, full_index: &[usize]) -> ViewResult<f64> {
        let field = self.field(chain)?;
        let offset = self.offset(full_index);
        Ok(field.get(offset).copied().unwrap_or(f64::NAN))
    }
}
