//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - search parameters and their fixed/swept value ranges (`Parameter`)
//! - first- and second-order filter subsystems (`Subsystem`)
//! - the per-node misfit result (`Misfit`)
//! - the run configuration assembled from CLI flags (`RunConfig`)

pub mod types;

pub use types::*;
