//! Discrete series helpers for the reference bundle.

pub mod diff;

pub use diff::*;
