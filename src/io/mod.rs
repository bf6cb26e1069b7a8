//! Input/output helpers.
//!
//! - plain-text series reading (`series`)
//! - result table + grid JSON exports (`export`)

pub mod export;
pub mod series;

pub use export::*;
pub use series::*;
