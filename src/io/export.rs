//! Result exports.
//!
//! The primary output is the whitespace-aligned result table (header row plus
//! one row per node). The populated grid can additionally be exported as JSON
//! for downstream plotting or comparisons.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::domain::ModelSpec;
use crate::error::AppError;
use crate::report;
use crate::space::{Axis, ParameterSpace};

/// Write the result table to `path`.
///
/// Called only after the engine completed the whole grid; a partially
/// computed space is rejected by the collector.
pub fn write_results(path: &Path, space: &ParameterSpace) -> Result<(), AppError> {
    let table = report::format_results(space)?;
    let mut file = File::create(path).map_err(|e| {
        AppError::resource(format!(
            "Failed to create result file '{}': {e}",
            path.display()
        ))
    })?;
    file.write_all(report::format_header(space).as_bytes())
        .and_then(|()| file.write_all(table.as_bytes()))
        .map_err(|e| {
            AppError::resource(format!(
                "Failed to write result file '{}': {e}",
                path.display()
            ))
        })
}

/// JSON schema of an exported grid.
#[derive(Debug, Serialize)]
pub struct GridFile<'a> {
    pub tool: &'static str,
    pub model: ModelSpec,
    pub axes: &'a [Axis],
    pub nodes: Vec<NodeRow>,
}

#[derive(Debug, Serialize)]
pub struct NodeRow {
    pub coords: Vec<f64>,
    pub md: f64,
    pub rms: f64,
}

/// Write the populated grid as JSON.
pub fn write_grid_json(
    path: &Path,
    space: &ParameterSpace,
    model: ModelSpec,
) -> Result<(), AppError> {
    let mut nodes = Vec::with_capacity(space.len());
    for (index, node) in space.nodes().iter().enumerate() {
        let Some(misfit) = node.result() else {
            return Err(AppError::numeric(format!(
                "Cannot export grid JSON: node {index} has no computed result."
            )));
        };
        nodes.push(NodeRow {
            coords: node.coords().to_vec(),
            md: misfit.md,
            rms: misfit.rms,
        });
    }

    let grid = GridFile {
        tool: "calgrid",
        model,
        axes: space.axes(),
        nodes,
    };

    let file = File::create(path).map_err(|e| {
        AppError::resource(format!(
            "Failed to create grid JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, &grid)
        .map_err(|e| AppError::resource(format!("Failed to write grid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Parameter;

    #[test]
    fn uncomputed_space_cannot_be_exported() {
        let space = ParameterSpace::build(&[Parameter::fixed("h", 0.7, 0.0)]).unwrap();
        let err = write_grid_json(Path::new("/nonexistent/grid.json"), &space, ModelSpec::Linear)
            .unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
