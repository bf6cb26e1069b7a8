//! Axis sample generation.
//!
//! Every configured parameter contributes one axis, in supply order: a swept
//! parameter contributes its scanning range, a fixed parameter contributes a
//! single-sample axis. Fixed parameters therefore still appear in every
//! node's coordinate tuple, which keeps the result table self-describing.

use serde::Serialize;

use crate::domain::{ParamKind, Parameter};
use crate::error::AppError;

/// Tolerance applied when counting samples so that ranges whose endpoints
/// align exactly in decimal (e.g. `0.60..0.70` step `0.05`) include the end
/// despite binary rounding.
const RANGE_EPS: f64 = 1e-9;

/// One dimension of the search grid.
#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    pub id: String,
    pub samples: Vec<f64>,
    /// Whether the source parameter was swept (fixed axes hold one sample).
    pub swept: bool,
}

impl Axis {
    /// Build the axis for a single parameter.
    pub fn from_parameter(param: &Parameter) -> Result<Self, AppError> {
        let (samples, swept) = match param.kind {
            ParamKind::Fixed { value } => (vec![value], false),
            ParamKind::Swept { start, end, delta } => {
                (sample_range(&param.id, start, end, delta)?, true)
            }
        };
        Ok(Self {
            id: param.id.clone(),
            samples,
            swept,
        })
    }
}

/// Generate the ordered sample sequence `start + k*delta` for
/// `k = 0 ..= floor((end-start)/delta)`.
///
/// Each sample is generated from the integer index in a single pass; nothing
/// is accumulated, so the sequence cannot drift into duplicates or gaps.
pub fn sample_range(id: &str, start: f64, end: f64, delta: f64) -> Result<Vec<f64>, AppError> {
    if !(start.is_finite() && end.is_finite() && delta.is_finite()) {
        return Err(AppError::semantic(format!(
            "Parameter '{id}': range [{start}, {end}] step {delta} must be finite."
        )));
    }
    if delta == 0.0 {
        return Err(AppError::semantic(format!(
            "Parameter '{id}': scanning range delta must be nonzero."
        )));
    }
    let span = end - start;
    if span != 0.0 && span.signum() != delta.signum() {
        return Err(AppError::semantic(format!(
            "Parameter '{id}': delta {delta} points away from end {end} (start {start})."
        )));
    }

    let count = (span / delta + RANGE_EPS).floor() as usize + 1;
    let mut samples = Vec::with_capacity(count);
    for k in 0..count {
        samples.push(start + k as f64 * delta);
    }
    Ok(samples)
}
