//! The abstract read contract and external collaborators.
//!
//! The engine never touches a physical file format. Each open file is
//! represented by one [`FileReader`] implementor supplied by the file-access
//! layer; everything the engine knows about a file goes through this trait.

use view_common::ViewResult;

/// Index-addressed read contract for one open file.
///
/// Implementors are expected to hand back data that is already usable:
/// hyperslab reads return floats pre-scaled by any linear scale/offset the
/// format carries, with NaNs normalized to the variable's fill sentinel.
pub trait FileReader {
    /// Identifying name of this file (path or equivalent).
    fn name(&self) -> &str;

    /// All variable names present in this file.
    fn variables(&self) -> Vec<String>;

    /// Whether the named variable exists in this file.
    fn has_variable(&self, var: &str) -> bool;

    /// Number of dimensions of a variable.
    fn dim_count(&self, var: &str) -> ViewResult<usize>;

    /// Name of one dimension of a variable.
    fn dim_name(&self, var: &str, dim: usize) -> ViewResult<String>;

    /// Local (per-file) extent of one dimension of a variable.
    fn dim_len(&self, var: &str, dim: usize) -> ViewResult<usize>;

    /// Fill sentinel for a variable.
    fn fill_value(&self, var: &str) -> f32;

    /// Name of this file's record (unlimited) dimension, if any.
    fn record_axis(&self) -> Option<String>;

    /// Read a rectangular sub-block of a variable, given local start and
    /// count vectors. Values are pre-scaled and NaN-normalized.
    fn read_hyperslab(&self, var: &str, start: &[usize], count: &[usize])
        -> ViewResult<Vec<f32>>;

    /// Coordinate value of a dimension at a local index.
    fn coord_value(&self, dim_name: &str, index: usize) -> ViewResult<f64>;

    /// Cell bounds of a dimension at a local index, when the file carries
    /// them.
    fn coord_bounds(&self, dim_name: &str, index: usize) -> ViewResult<Option<(f64, f64)>>;

    /// Units string of a dimension, if declared.
    fn dim_units(&self, dim_name: &str) -> Option<String>;

    /// Calendar tag of a dimension, if declared.
    fn dim_calendar(&self, dim_name: &str) -> Option<String>;

    /// Name of the variable holding the true coordinate of `dim_name` for
    /// `var`, when the coordinate is mapped rather than derived from the
    /// index (e.g. a CF `coordinates` attribute).
    fn coord_mapping_var(&self, var: &str, dim_name: &str) -> Option<String>;
}

/// External units-conversion collaborator.
///
/// Used when a virtually concatenated variable carries different units for
/// the same dimension across files; values are converted into the first
/// file's units. Returning `None` means the conversion is unknown.
pub trait UnitsConverter {
    fn convert(&self, value: f64, from_units: &str, to_units: &str) -> Option<f64>;
}

/// Decide whether a variable is worth offering for display: at least one
/// axis longer than one, not itself a coordinate variable, and an aggregate
/// size greater than one.
pub fn is_displayable(reader: &dyn FileReader, var: &str) -> ViewResult<bool> {
    let ndims = reader.dim_count(var)?;

    let mut aggregate = 1usize;
    let mut has_long_axis = false;
    for dim in 0..ndims {
        let len = reader.dim_len(var, dim)?;
        aggregate *= len;
        if len > 1 {
            has_long_axis = true;
        }
        // A coordinate variable is named after one of its own dimensions.
        if reader.dim_name(var, dim)? == var {
            return Ok(false);
        }
    }

    Ok(has_long_axis && aggregate > 1)
}

#[cfg(test)]
mod tests {
    // Exercised through the in-memory reader in the integration tests; the
    // displayability rules are covered in crates/dataset/tests.
}
