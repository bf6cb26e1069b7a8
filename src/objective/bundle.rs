//! Shared read-only reference data for the objective.
//!
//! The bundle is built once, before any node evaluation, and then shared by
//! reference across all workers. It is never mutated afterwards, so the
//! engine needs no locking around it.

use crate::domain::ModelSpec;
use crate::error::AppError;
use crate::math;

/// The calibration input series plus the calibration output series and its
/// derived series.
///
/// Square and cube series are only present for the nonlinear model.
#[derive(Debug, Clone)]
pub struct ReferenceBundle {
    pub calib_in: Vec<f64>,
    pub y: Vec<f64>,
    pub y_dif: Vec<f64>,
    pub y_dif2: Vec<f64>,
    pub y_square: Option<Vec<f64>>,
    pub y_cube: Option<Vec<f64>>,
}

impl ReferenceBundle {
    /// Precompute everything the chosen model needs from the two recorded
    /// series.
    pub fn new(
        calib_in: Vec<f64>,
        calib_out: Vec<f64>,
        dt: f64,
        model: ModelSpec,
    ) -> Result<Self, AppError> {
        if calib_in.is_empty() || calib_out.is_empty() {
            return Err(AppError::numeric(
                "Calibration series must not be empty.",
            ));
        }
        if calib_in.len() != calib_out.len() {
            return Err(AppError::numeric(format!(
                "Inconsistent length of time series: calibration input has {} samples, \
                 calibration output has {}.",
                calib_in.len(),
                calib_out.len()
            )));
        }

        let y_dif = math::dif(&calib_out, dt)?;
        let y_dif2 = math::dif2(&calib_out, dt)?;
        let (y_square, y_cube) = match model {
            ModelSpec::Linear => (None, None),
            ModelSpec::Nonlinear => (
                Some(math::square(&calib_out)),
                Some(math::cube(&calib_out)),
            ),
        };

        Ok(Self {
            calib_in,
            y: calib_out,
            y_dif,
            y_dif2,
            y_square,
            y_cube,
        })
    }

    /// Number of samples in every contained series.
    pub fn len(&self) -> usize {
        self.calib_in.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calib_in.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(n: usize) -> Vec<f64> {
        (0..n).map(|j| j as f64 * 0.1).collect()
    }

    #[test]
    fn linear_bundle_skips_square_and_cube() {
        let bundle = ReferenceBundle::new(ramp(8), ramp(8), 0.5, ModelSpec::Linear).unwrap();
        assert!(bundle.y_square.is_none());
        assert!(bundle.y_cube.is_none());
        assert_eq!(bundle.y_dif.len(), 8);
        assert_eq!(bundle.y_dif2.len(), 8);
    }

    #[test]
    fn nonlinear_bundle_carries_square_and_cube() {
        let bundle = ReferenceBundle::new(ramp(8), ramp(8), 0.5, ModelSpec::Nonlinear).unwrap();
        assert_eq!(bundle.y_square.as_ref().unwrap().len(), 8);
        assert_eq!(bundle.y_cube.as_ref().unwrap().len(), 8);
    }

    #[test]
    fn mismatched_series_lengths_are_a_numeric_error() {
        let err = ReferenceBundle::new(ramp(8), ramp(7), 0.5, ModelSpec::Linear).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn empty_series_are_a_numeric_error() {
        let err = ReferenceBundle::new(vec![], vec![], 0.5, ModelSpec::Linear).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
