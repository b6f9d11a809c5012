//! In-memory implementation of the file read contract.
//!
//! Tests build small synthetic files with the builder methods and hand
//! them to `Dataset::open` exactly like real file handles. Multi-file
//! virtual datasets are just several `MemoryFile`s sharing variable and
//! dimension names.

use std::collections::HashMap;

use dataset::FileReader;
use view_common::{ViewError, ViewResult};

/// One dimension of an in-memory file, with its coordinate values.
#[derive(Debug, Clone)]
pub struct MemoryDim {
    pub name: String,
    pub coords: Vec<f64>,
    pub bounds: Option<Vec<(f64, f64)>>,
    pub units: Option<String>,
    pub calendar: Option<String>,
}

/// One variable of an in-memory file.
#[derive(Debug, Clone)]
pub struct MemoryVariable {
    pub name: String,
    pub dims: Vec<String>,
    pub data: Vec<f32>,
    pub fill_value: f32,
}

/// A synthetic file implementing [`FileReader`].
pub struct MemoryFile {
    name: String,
    record_axis: Option<String>,
    dims: Vec<MemoryDim>,
    variables: Vec<MemoryVariable>,
    /// (variable, dimension) -> coordinate variable name.
    coord_mappings: HashMap<(String, String), String>,
}

impl MemoryFile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            record_axis: None,
            dims: Vec::new(),
            variables: Vec::new(),
            coord_mappings: HashMap::new(),
        }
    }

    /// Declare the record (unlimited) dimension.
    pub fn with_record_axis(mut self, name: &str) -> Self {
        self.record_axis = Some(name.to_string());
        self
    }

    /// Add a dimension with plain coordinate values.
    pub fn with_dim(mut self, name: &str, coords: Vec<f64>) -> Self {
        self.dims.push(MemoryDim {
            name: name.to_string(),
            coords,
            bounds: None,
            units: None,
            calendar: None,
        });
        self
    }

    /// Add a dimension with units (and optionally a calendar tag).
    pub fn with_dim_units(
        mut self,
        name: &str,
        coords: Vec<f64>,
        units: &str,
        calendar: Option<&str>,
    ) -> Self {
        self.dims.push(MemoryDim {
            name: name.to_string(),
            coords,
            bounds: None,
            units: Some(units.to_string()),
            calendar: calendar.map(str::to_string),
        });
        self
    }

    /// Attach cell bounds to an already-added dimension.
    pub fn with_bounds(mut self, dim: &str, bounds: Vec<(f64, f64)>) -> Self {
        if let Some(d) = self.dims.iter_mut().find(|d| d.name == dim) {
            d.bounds = Some(bounds);
        }
        self
    }

    /// Add a variable over previously added dimensions.
    pub fn with_variable(mut self, name: &str, dims: &[&str], data: Vec<f32>, fill: f32) -> Self {
        self.variables.push(MemoryVariable {
            name: name.to_string(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            data,
            fill_value: fill,
        });
        self
    }

    /// Declare that `dim` of `var` takes its true coordinate from another
    /// variable.
    pub fn with_coord_mapping(mut self, var: &str, dim: &str, coord_var: &str) -> Self {
        self.coord_mappings
            .insert((var.to_string(), dim.to_string()), coord_var.to_string());
        self
    }

    /// Finish building: box as a read-contract handle.
    pub fn build(self) -> Box<dyn FileReader> {
        Box::new(self)
    }

    fn find_var(&self, name: &str) -> ViewResult<&MemoryVariable> {
        self.variables
            .iter()
            .find(|v| v.name == name)
            .ok_or_else(|| ViewError::VariableNotFound(name.to_string()))
    }

    fn find_dim(&self, name: &str) -> ViewResult<&MemoryDim> {
        self.dims
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ViewError::DimensionNotFound(name.to_string()))
    }

    fn shape_of(&self, var: &MemoryVariable) -> ViewResult<Vec<usize>> {
        var.dims
            .iter()
            .map(|d| self.find_dim(d).map(|dim| dim.coords.len()))
            .collect()
    }
}

impl FileReader for MemoryFile {
    fn name(&self) -> &str {
        &self.name
    }

    fn variables(&self) -> Vec<String> {
        self.variables.iter().map(|v| v.name.clone()).collect()
    }

    fn has_variable(&self, var: &str) -> bool {
        self.variables.iter().any(|v| v.name == var)
    }

    fn dim_count(&self, var: &str) -> ViewResult<usize> {
        Ok(self.find_var(var)?.dims.len())
    }

    fn dim_name(&self, var: &str, dim: usize) -> ViewResult<String> {
        let var = self.find_var(var)?;
        var.dims
            .get(dim)
            .cloned()
            .ok_or_else(|| ViewError::DimensionNotFound(format!("axis {} of {}", dim, var.name)))
    }

    fn dim_len(&self, var: &str, dim: usize) -> ViewResult<usize> {
        let name = self.dim_name(var, dim)?;
        Ok(self.find_dim(&name)?.coords.len())
    }

    fn fill_value(&self, var: &str) -> f32 {
        self.find_var(var).map(|v| v.fill_value).unwrap_or(f32::NAN)
    }

    fn record_axis(&self) -> Option<String> {
        self.record_axis.clone()
    }

    fn read_hyperslab(
        &self,
        var: &str,
        start: &[usize],
        count: &[usize],
    ) -> ViewResult<Vec<f32>> {
        let variable = self.find_var(var)?;
        let shape = self.shape_of(variable)?;
        if start.len() != shape.len() || count.len() != shape.len() {
            return Err(ViewError::ReadFailed(format!(
                "hyperslab rank {} does not match variable rank {}",
                start.len(),
                shape.len()
            )));
        }
        for dim in 0..shape.len() {
            if start[dim] + count[dim] > shape[dim] {
                return Err(ViewError::ReadFailed(format!(
                    "hyperslab [{}+{}] exceeds extent {} on axis {} of {}",
                    start[dim], count[dim], shape[dim], dim, var
                )));
            }
        }

        let total: usize = count.iter().product();
        let mut out = Vec::with_capacity(total);
        if total == 0 {
            return Ok(out);
        }

        // Odometer over the count vector, last axis fastest.
        let ndims = shape.len();
        let offset_of = |idx: &[usize]| -> usize {
            let mut offset = 0usize;
            let mut stride = 1usize;
            for dim in (0..ndims).rev() {
                offset += (start[dim] + idx[dim]) * stride;
                stride *= shape[dim];
            }
            offset
        };
        let mut idx = vec![0usize; ndims];
        loop {
            out.push(variable.data[offset_of(&idx)]);
            let mut dim = ndims;
            loop {
                if dim == 0 {
                    return Ok(out);
                }
                dim -= 1;
                idx[dim] += 1;
                if idx[dim] < count[dim] {
                    break;
                }
                idx[dim] = 0;
            }
        }
    }

    fn coord_value(&self, dim_name: &str, index: usize) -> ViewResult<f64> {
        let dim = self.find_dim(dim_name)?;
        dim.coords.get(index).copied().ok_or_else(|| {
            ViewError::ReadFailed(format!("index {} beyond dimension {}", index, dim_name))
        })
    }

    fn coord_bounds(&self, dim_name: &str, index: usize) -> ViewResult<Option<(f64, f64)>> {
        let dim = self.find_dim(dim_name)?;
        Ok(dim.bounds.as_ref().and_then(|b| b.get(index).copied()))
    }

    fn dim_units(&self, dim_name: &str) -> Option<String> {
        self.find_dim(dim_name).ok().and_then(|d| d.units.clone())
    }

    fn dim_calendar(&self, dim_name: &str) -> Option<String> {
        self.find_dim(dim_name).ok().and_then(|d| d.calendar.clone())
    }

    fn coord_mapping_var(&self, var: &str, dim_name: &str) -> Option<String> {
        self.coord_mappings
            .get(&(var.to_string(), dim_name.to_string()))
            .cloned()
    }
}
