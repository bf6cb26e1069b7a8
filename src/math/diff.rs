//! Discrete derivatives of a sampled time series.
//!
//! The objective compares the calibration input against a combination of the
//! calibration output and its first and second derivatives. Derivatives are
//! approximated with central differences; the two boundary samples copy their
//! nearest interior neighbour so every derived series keeps the original
//! length.

use crate::error::AppError;

fn check_input(series: &[f64], dt: f64) -> Result<(), AppError> {
    if series.len() < 3 {
        return Err(AppError::numeric(format!(
            "Series too short for differentiation: {} samples (need at least 3).",
            series.len()
        )));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(AppError::numeric(format!(
            "Invalid sampling interval dt={dt} (must be finite and > 0)."
        )));
    }
    Ok(())
}

/// Central-difference first derivative: `(y[j+1] - y[j-1]) / (2*dt)`.
pub fn dif(series: &[f64], dt: f64) -> Result<Vec<f64>, AppError> {
    check_input(series, dt)?;
    let n = series.len();
    let mut out = vec![0.0; n];
    for j in 1..n - 1 {
        out[j] = (series[j + 1] - series[j - 1]) / (2.0 * dt);
    }
    out[0] = out[1];
    out[n - 1] = out[n - 2];
    Ok(out)
}

/// Central-difference second derivative: `(y[j+1] - 2*y[j] + y[j-1]) / dt²`.
pub fn dif2(series: &[f64], dt: f64) -> Result<Vec<f64>, AppError> {
    check_input(series, dt)?;
    let n = series.len();
    let mut out = vec![0.0; n];
    let dt2 = dt * dt;
    for j in 1..n - 1 {
        out[j] = (series[j + 1] - 2.0 * series[j] + series[j - 1]) / dt2;
    }
    out[0] = out[1];
    out[n - 1] = out[n - 2];
    Ok(out)
}

/// Element-wise square.
pub fn square(series: &[f64]) -> Vec<f64> {
    series.iter().map(|v| v * v).collect()
}

/// Element-wise cube.
pub fn cube(series: &[f64]) -> Vec<f64> {
    series.iter().map(|v| v * v * v).collect()
}
