//! Shared test utilities for the gridview workspace.
//!
//! This crate provides common testing infrastructure:
//! - An in-memory implementation of the file read contract
//! - Deterministic grid and coordinate-field generators
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod generators;
pub mod memory;

pub use generators::*;
pub use memory::{MemoryDim, MemoryFile, MemoryVariable};
