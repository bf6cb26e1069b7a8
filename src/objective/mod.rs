//! Objective evaluation.
//!
//! Responsibilities:
//!
//! - hold the shared read-only reference data (`bundle`)
//! - evaluate the linear/nonlinear instrument-model misfit at a grid node
//!   (`visitor`)

pub mod bundle;
pub mod visitor;

pub use bundle::*;
pub use visitor::*;
