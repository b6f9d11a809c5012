//! Data model for multi-file gridded datasets.
//!
//! This crate owns everything between the abstract per-file read contract
//! and the view layer:
//!
//! - [`FileReader`] — the index-addressed read contract one physical file
//!   implements (hyperslab reads pre-scaled, NaNs normalized to fill)
//! - [`FileChain`] — the ordered per-variable file sequence with cross-file
//!   index translation along the concatenation axis
//! - [`Variable`] / [`Dimension`] — the aggregate data model, with
//!   dimension identity shared by (name, chain fingerprint)
//! - [`CoordMapping`] — scalar and curvilinear coordinate descriptors
//! - [`CoordinateResolver`] — index -> coordinate value/label resolution
//! - [`estimate_range`] — sampled extrema estimation over the scan axis

pub mod chain;
pub mod dataset;
pub mod dimension;
pub mod extrema;
pub mod mapping;
pub mod resolver;
pub mod source;
pub mod variable;

pub use chain::{FileChain, FileSlab};
pub use dataset::Dataset;
pub use dimension::{Dimension, DimensionTable};
pub use extrema::{estimate_range, RangeEstimate, ScanDensity};
pub use mapping::{CoordMapping, CurvilinearMapping, ScalarMapping};
pub use resolver::{Coordinate, CoordinateResolver};
pub use source::{FileReader, UnitsConverter};
pub use variable::Variable;
