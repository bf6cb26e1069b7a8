//! `calgrid` library crate.
//!
//! The binary (`calgrid`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., embedding the search in other tooling)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod grammar;
pub mod io;
pub mod math;
pub mod objective;
pub mod report;
pub mod search;
pub mod space;
