//! Shared types for the gridview engine.
//!
//! This crate holds the pieces every other crate in the workspace needs:
//! the central error type, fill-sentinel matching, and the owned 2-D slice
//! container that moves between the dataset, resample, and view layers.

pub mod error;
pub mod fill;
pub mod slice;

pub use error::{Severity, ViewError, ViewResult};
pub use fill::{is_fill, SECONDARY_SENTINEL};
pub use slice::Slice2d;
