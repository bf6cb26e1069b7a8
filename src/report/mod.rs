//! Result collection and formatted terminal output.
//!
//! The collector walks the parameter space in its fixed forward order, so the
//! emitted table is stable across runs and worker counts. Formatting lives in
//! one place so output changes stay localized.

use crate::domain::{Misfit, RunConfig};
use crate::error::AppError;
use crate::space::{Node, ParameterSpace};

/// Header row: axis ids, then the misfit field names.
pub fn format_header(space: &ParameterSpace) -> String {
    let mut out = String::new();
    for axis in space.axes() {
        out.push_str(&format!("{:<12} ", axis.id));
    }
    out.push_str(&format!("    {:>12} {:>12}", "MD misfit", "RMS misfit"));
    out.push('\n');
    out
}

/// One row per node: coordinates in axis order, then the misfit fields.
///
/// Every node must carry a computed result; the engine guarantees this after
/// a successful run.
pub fn format_results(space: &ParameterSpace) -> Result<String, AppError> {
    let mut out = String::new();
    for (index, node) in space.nodes().iter().enumerate() {
        let Some(misfit) = node.result() else {
            return Err(AppError::numeric(format!(
                "Cannot collect results: node {index} has no computed result."
            )));
        };
        for c in node.coords() {
            out.push_str(&format!("{c:<12.6} "));
        }
        out.push_str(&format!("    {:>12.6} {:>12.6}", misfit.md, misfit.rms));
        out.push('\n');
    }
    Ok(out)
}

/// The node with the smallest RMS misfit; ties break toward the earlier grid
/// index so the answer is deterministic.
pub fn best_node(space: &ParameterSpace) -> Option<(usize, &Node, Misfit)> {
    let mut best: Option<(usize, &Node, Misfit)> = None;
    for (index, node) in space.nodes().iter().enumerate() {
        let Some(misfit) = node.result() else {
            continue;
        };
        match &best {
            Some((_, _, current)) if misfit.rms >= current.rms => {}
            _ => best = Some((index, node, *misfit)),
        }
    }
    best
}

/// Format the run summary (configuration echo + grid shape + best node).
pub fn format_run_summary(config: &RunConfig, space: &ParameterSpace) -> String {
    let mut out = String::new();

    out.push_str("=== calgrid - grid-search calibration ===\n");
    out.push_str(&format!("Model:   {}\n", config.model.display_name()));
    out.push_str(&format!("Threads: {}\n", config.threads));
    out.push_str(&format!("dt:      {}s\n", config.dt));
    out.push_str(&format!(
        "Input:   {} | {}\n",
        config.calib_in.display(),
        config.calib_out.display()
    ));

    out.push_str("\nGrid:\n");
    for axis in space.axes() {
        let kind = if axis.swept { "swept" } else { "fixed" };
        out.push_str(&format!(
            "- {:<12} {kind:<5} {} sample(s)\n",
            axis.id,
            axis.samples.len()
        ));
    }
    out.push_str(&format!("- {} node(s)\n", space.len()));

    if let Some((_, node, misfit)) = best_node(space) {
        out.push_str("\nBest parameter configuration (by RMS misfit):\n");
        for (axis, c) in space.axes().iter().zip(node.coords()) {
            out.push_str(&format!("- {:<12} {c:.6}\n", axis.id));
        }
        out.push_str(&format!(
            "- MD misfit {:.6} | RMS misfit {:.6}\n",
            misfit.md, misfit.rms
        ));
    }

    out
}
