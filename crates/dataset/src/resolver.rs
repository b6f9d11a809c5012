//! Coordinate resolution.
//!
//! Given (variable, dimension, index), produce the coordinate value a user
//! should see. Resolution order: curvilinear field cache, scalar per-file
//! cache, then a single-cell read through the file contract. When the file
//! carries cell bounds, their midpoint is authoritative over the raw
//! coordinate value; producers' bounds are more reliable than their point
//! coordinates.

use std::cell::RefCell;
use std::collections::HashSet;

use tracing::warn;
use view_common::ViewResult;

use crate::mapping::CoordMapping;
use crate::source::UnitsConverter;
use crate::variable::Variable;

/// A resolved coordinate: the numeric value, optional cell bounds, and a
/// display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub value: f64,
    pub bounds: Option<(f64, f64)>,
    pub label: String,
}

/// Resolver with one-time-warning bookkeeping for missing unit conversions.
#[derive(Default)]
pub struct CoordinateResolver {
    warned: RefCell<HashSet<(String, String)>>,
}

impl CoordinateResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the coordinate of `var` along dimension `dim_idx` at
    /// `index`. `full_index` is the complete per-dimension index vector of
    /// the current cell (curvilinear mappings need every component).
    pub fn resolve(
        &self,
        var: &Variable,
        dim_idx: usize,
        index: usize,
        full_index: &[usize],
        converter: Option<&dyn UnitsConverter>,
    ) -> ViewResult<Coordinate> {
        let dim = &var.dims[dim_idx];

        // 1. Curvilinear mapping: pure cache lookup, no file I/O.
        if let Some(CoordMapping::Curvilinear(mapping)) = &var.mappings[dim_idx] {
            let value = mapping.value_at(&var.chain, full_index)?;
            return Ok(Coordinate {
                value,
                bounds: None,
                label: dim.label(value),
            });
        }

        // 2. Scalar mapping: resolved per file ordinal, since the same
        // scalar can differ across a virtual concatenation.
        if let Some(CoordMapping::Scalar(mapping)) = &var.mappings[dim_idx] {
            let (ordinal, _) = var.chain.translate(full_index[0])?;
            let value = mapping.value(&var.chain, ordinal)?;
            return Ok(Coordinate {
                value,
                bounds: None,
                label: dim.label(value),
            });
        }

        // 3. Plain dimension: translate the 1-D index and read one cell
        // (and its bounds) through the file contract.
        let (ordinal, local) = if dim_idx == 0 {
            var.chain.translate(index)?
        } else {
            (0, index)
        };
        let slab = var.chain.get(ordinal).ok_or_else(|| {
            view_common::ViewError::ReadFailed(format!(
                "missing file {} for '{}'",
                ordinal, var.name
            ))
        })?;

        let raw = slab.reader.coord_value(&dim.name, local)?;
        let bounds = slab.reader.coord_bounds(&dim.name, local)?;
        let mut value = match bounds {
            Some((lo, hi)) => (lo + hi) / 2.0,
            None => raw,
        };

        // Virtual variables may mix units across files; convert into the
        // first file's units so the scan axis stays consistent.
        if var.is_virtual() && ordinal > 0 {
            let first_units = var
                .chain
                .get(0)
                .and_then(|s| s.reader.dim_units(&dim.name));
            let local_units = slab.reader.dim_units(&dim.name);
            if let (Some(from), Some(to)) = (local_units, first_units) {
                if from != to {
                    value = self.convert_or_warn(var, &dim.name, value, &from, &to, converter);
                }
            }
        }

        Ok(Coordinate {
            value,
            bounds,
            label: dim.label(value),
        })
    }

    fn convert_or_warn(
        &self,
        var: &Variable,
        dim_name: &str,
        value: f64,
        from: &str,
        to: &str,
        converter: Option<&dyn UnitsConverter>,
    ) -> f64 {
        if let Some(converter) = converter {
            if let Some(converted) = converter.convert(value, from, to) {
                return converted;
            }
        }
        let key = (var.name.clone(), dim_name.to_string());
        if self.warned.borrow_mut().insert(key) {
            warn!(
                variable = %var.name,
                dimension = %dim_name,
                from = %from,
                to = %to,
                "no unit conversion available across files; showing unconverted values"
            );
        }
        value
    }
}

#[cfg(test)]
mod tests {
    // Resolution paths need a populated Variable; covered in
    // tests/resolver_tests.rs against the in-memory reader.
}
