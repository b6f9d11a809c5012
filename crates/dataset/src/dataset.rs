//! Dataset assembly from opened files.
//!
//! `Dataset::open` takes the per-file read handles the file-access layer
//! produced and builds the aggregate model: virtual variables concatenated
//! along the record axis, shared dimensions, and coordinate mappings.

use std::rc::Rc;

use tracing::debug;
use view_common::{ViewError, ViewResult};

use crate::chain::FileChain;
use crate::dimension::DimensionTable;
use crate::mapping::{CoordMapping, CurvilinearMapping, ScalarMapping};
use crate::source::{is_displayable, FileReader};
use crate::variable::Variable;

/// All variables assembled from a set of opened files.
pub struct Dataset {
    variables: Vec<Variable>,
    displayable: Vec<String>,
    dimensions: DimensionTable,
}

impl std::fmt::Debug for Dataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dataset")
            .field(
                "variables",
                &self.variables.iter().map(|v| &v.name).collect::<Vec<_>>(),
            )
            .field("displayable", &self.displayable)
            .finish_non_exhaustive()
    }
}

impl Dataset {
    /// Assemble the aggregate model. A variable present in several files
    /// whose leading dimension is the record axis becomes virtual,
    /// concatenated along dimension 0; other variables read from the first
    /// file that carries them. Non-concatenated dimension extents must be
    /// uniform across a chain.
    pub fn open(readers: Vec<Box<dyn FileReader>>) -> ViewResult<Self> {
        let readers: Vec<Rc<dyn FileReader>> = readers.into_iter().map(Rc::from).collect();

        // Candidate names in first-seen order across the files.
        let mut names: Vec<String> = Vec::new();
        for reader in &readers {
            for name in reader.variables() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        let mut variables = Vec::new();
        let mut displayable = Vec::new();
        let mut dimensions = DimensionTable::new();

        for name in &names {
            let holders: Vec<Rc<dyn FileReader>> = readers
                .iter()
                .filter(|r| r.has_variable(name))
                .map(Rc::clone)
                .collect();
            let first = &holders[0];

            let ndims = first.dim_count(name)?;
            if ndims == 0 {
                continue;
            }
            let mut dim_names = Vec::with_capacity(ndims);
            for dim in 0..ndims {
                dim_names.push(first.dim_name(name, dim)?);
            }

            // Concatenate only along a leading record axis.
            let concatenated = holders.len() > 1
                && first.record_axis().as_deref() == Some(dim_names[0].as_str());
            let chain = if concatenated {
                FileChain::open(name, &holders)?
            } else {
                FileChain::open(name, &holders[..1])?
            };

            let mut shape = Vec::with_capacity(ndims);
            shape.push(chain.total_extent());
            for dim in 1..ndims {
                let expected = first.dim_len(name, dim)?;
                for slab in chain.iter().skip(1) {
                    let found = slab.reader.dim_len(name, dim)?;
                    if found != expected {
                        return Err(ViewError::ChainShapeMismatch {
                            variable: name.clone(),
                            dimension: dim_names[dim].clone(),
                            expected,
                            found,
                        });
                    }
                }
                shape.push(expected);
            }

            let mut mappings = Vec::with_capacity(ndims);
            for dim in 0..ndims {
                mappings.push(discover_mapping(
                    first.as_ref(),
                    name,
                    &dim_names,
                    &shape,
                    &dim_names[dim],
                    chain.len(),
                )?);
            }

            let mut dims = Vec::with_capacity(ndims);
            for dim in 0..ndims {
                let is_record = dim == 0 && concatenated;
                dims.push(dimensions.get_or_open(&dim_names[dim], shape[dim], is_record, &chain));
            }

            if is_displayable(first.as_ref(), name)? {
                displayable.push(name.clone());
            }

            debug!(
                variable = %name,
                files = chain.len(),
                extent = chain.total_extent(),
                "opened variable"
            );

            variables.push(Variable {
                name: name.clone(),
                shape,
                dim_names,
                dims,
                fill_value: first.fill_value(name),
                chain,
                mappings,
            });
        }

        Ok(Self {
            variables,
            displayable,
            dimensions,
        })
    }

    /// Names of variables worth offering for display.
    pub fn displayable_variables(&self) -> &[String] {
        &self.displayable
    }

    /// Look up a variable by name.
    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    /// Mutable lookup (needed to refresh a growing record axis).
    pub fn variable_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.variables.iter_mut().find(|v| v.name == name)
    }

    /// All assembled variables.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// The shared dimension table.
    pub fn dimensions(&self) -> &DimensionTable {
        &self.dimensions
    }
}

/// Inspect the coordinate variable mapped onto `dim_name` (if any) and
/// build the matching descriptor. A mapping variable with no non-unit
/// dimensions is a per-file scalar; one with exactly two non-unit
/// dimensions of the owning variable is a curvilinear field. Anything else
/// means the in-memory model is not one this engine supports.
fn discover_mapping(
    reader: &dyn FileReader,
    var: &str,
    var_dims: &[String],
    var_shape: &[usize],
    dim_name: &str,
    chain_len: usize,
) -> ViewResult<Option<CoordMapping>> {
    let coord_var = match reader.coord_mapping_var(var, dim_name) {
        Some(v) => v,
        None => return Ok(None),
    };

    let ndims = reader.dim_count(&coord_var)?;
    let mut coord_dims = Vec::with_capacity(ndims);
    for dim in 0..ndims {
        coord_dims.push((
            reader.dim_name(&coord_var, dim)?,
            reader.dim_len(&coord_var, dim)?,
        ));
    }

    let effective: Vec<&(String, usize)> = coord_dims.iter().filter(|(_, len)| *len > 1).collect();

    match effective.len() {
        0 => Ok(Some(CoordMapping::Scalar(ScalarMapping::new(
            coord_var, chain_len,
        )))),
        2 => {
            for (name, _) in &effective {
                let covered = var_dims
                    .iter()
                    .zip(var_shape)
                    .any(|(d, &len)| d == name && len > 1);
                if !covered {
                    return Err(ViewError::UnsupportedMapping {
                        variable: var.to_string(),
                        effective_dims: effective.len(),
                    });
                }
            }
            // Stride of each coordinate-field dimension, row-major.
            let mut strides = vec![0usize; coord_dims.len()];
            let mut stride = 1usize;
            for (i, (_, len)) in coord_dims.iter().enumerate().rev() {
                strides[i] = stride;
                stride *= len;
            }
            let place_factors = var_dims
                .iter()
                .map(|d| {
                    coord_dims
                        .iter()
                        .position(|(name, _)| name == d)
                        .map(|i| strides[i])
                        .unwrap_or(0)
                })
                .collect();
            Ok(Some(CoordMapping::Curvilinear(CurvilinearMapping::new(
                coord_var,
                place_factors,
            ))))
        }
        n => Err(ViewError::UnsupportedMapping {
            variable: var.to_string(),
            effective_dims: n,
        }),
    }
}

#[cfg(test)]
mod tests {
    // Dataset assembly is covered end to end in the integration tests with
    // the in-memory reader (tests/addressor_tests.rs, resolver_tests.rs).
}
