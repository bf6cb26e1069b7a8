//! Parameter space construction and ownership.
//!
//! Responsibilities:
//!
//! - turn each configured parameter into an ordered axis sample sequence
//! - materialize the Cartesian product of all axes as a flat node arena
//! - provide the deterministic forward iteration order used by the collector

pub mod axis;
pub mod grid;

pub use axis::*;
pub use grid::*;
