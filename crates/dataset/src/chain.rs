//! Ordered per-variable file chains.
//!
//! A virtual variable concatenates the same-named variable across several
//! physical files along dimension 0. The chain is an owned, ordered,
//! indexable sequence of slabs; translation from a global index to a
//! (file, local index) pair walks the chain linearly, accumulating extents.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use view_common::{ViewError, ViewResult};

use crate::source::FileReader;

/// One file's contribution to a virtual variable.
#[derive(Clone)]
pub struct FileSlab {
    /// Handle to the open file.
    pub reader: Rc<dyn FileReader>,
    /// Position of this file in the chain.
    pub ordinal: usize,
    /// Global index of this file's first record along dimension 0.
    pub offset0: usize,
    /// Local extent along dimension 0.
    pub extent0: usize,
}

/// The ordered file sequence backing one variable. Cloning a chain clones
/// handles, not files; slabs share their readers.
#[derive(Clone)]
pub struct FileChain {
    variable: String,
    slabs: Vec<FileSlab>,
}

impl FileChain {
    /// Build a chain for `variable` over the given readers, in order.
    /// Extents along dimension 0 are taken from each file; the running
    /// offsets are accumulated here.
    pub fn open(variable: &str, readers: &[Rc<dyn FileReader>]) -> ViewResult<Self> {
        let mut slabs = Vec::with_capacity(readers.len());
        let mut offset0 = 0usize;

        for (ordinal, reader) in readers.iter().enumerate() {
            let extent0 = reader.dim_len(variable, 0)?;
            slabs.push(FileSlab {
                reader: Rc::clone(reader),
                ordinal,
                offset0,
                extent0,
            });
            offset0 += extent0;
        }

        Ok(Self {
            variable: variable.to_string(),
            slabs,
        })
    }

    /// Name of the variable this chain backs.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Number of files in the chain.
    pub fn len(&self) -> usize {
        self.slabs.len()
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.slabs.is_empty()
    }

    /// Aggregate extent along dimension 0.
    pub fn total_extent(&self) -> usize {
        self.slabs.last().map(|s| s.offset0 + s.extent0).unwrap_or(0)
    }

    /// Slab at a given ordinal.
    pub fn get(&self, ordinal: usize) -> Option<&FileSlab> {
        self.slabs.get(ordinal)
    }

    /// Iterate over the slabs in chain order.
    pub fn iter(&self) -> impl Iterator<Item = &FileSlab> {
        self.slabs.iter()
    }

    /// Translate a global index along dimension 0 into (file ordinal, local
    /// index). Walks the chain linearly, accumulating each file's extent
    /// until the running upper bound covers the requested index.
    ///
    /// An index at or beyond the aggregate extent is an invariant violation
    /// (the in-memory model no longer matches the files), reported as a
    /// typed fatal error.
    pub fn translate(&self, index0: usize) -> ViewResult<(usize, usize)> {
        let mut upper = 0usize;
        for slab in &self.slabs {
            upper += slab.extent0;
            if index0 < upper {
                return Ok((slab.ordinal, index0 - slab.offset0));
            }
        }
        Err(ViewError::IndexBeyondExtent {
            variable: self.variable.clone(),
            index: index0,
            extent: self.total_extent(),
        })
    }

    /// Re-query the trailing file's extent along dimension 0. Record axes
    /// grow while a model run is still writing; only the last file in the
    /// chain may change.
    pub fn refresh_trailing_extent(&mut self) -> ViewResult<usize> {
        if let Some(slab) = self.slabs.last_mut() {
            slab.extent0 = slab.reader.dim_len(&self.variable, 0)?;
        }
        Ok(self.total_extent())
    }

    /// Stable identity of the file sequence, used to decide whether two
    /// dimensions backed by different variables are the same dimension.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        for slab in &self.slabs {
            slab.reader.name().hash(&mut hasher);
        }
        self.slabs.len().hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    // Chain construction needs a FileReader; covered by the integration
    // tests in tests/addressor_tests.rs using the in-memory reader.
}
