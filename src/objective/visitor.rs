//! The misfit visitors.
//!
//! Both instrument models synthesize a model series sample-by-sample from the
//! reference bundle and compare it against the calibration input:
//!
//! - linear:    `y'' + ((2π/T0)·h)·y' + (4π²/T0)·y`
//! - nonlinear: linear model plus `c0·y²` and `c1·y³`
//!
//! The per-sample absolute difference `d_j` yields two normalized misfits:
//!
//! - `md  = Σ|d_j| / Σ|input_j|`
//! - `rms = sqrt(Σ d_j² / Σ input_j²)`
//!
//! Evaluation is pure given the shared bundle: the same coordinates always
//! produce the same result, which is what makes unordered parallel execution
//! safe.

use std::f64::consts::PI;

use crate::domain::{Misfit, ModelSpec};
use crate::error::AppError;
use crate::objective::ReferenceBundle;
use crate::space::Axis;

/// The objective visitor, bound once at setup to the axes of the grid.
///
/// Coordinates are bound by axis id, so parameter supply order does not
/// matter to the model; fixed single-sample axes bind like any other.
#[derive(Debug)]
pub struct Objective<'a> {
    bundle: &'a ReferenceBundle,
    binding: Binding,
}

/// Closed set of model variants; selected once, never dispatched openly.
#[derive(Debug)]
enum Binding {
    Linear {
        h: usize,
        t0: usize,
    },
    Nonlinear {
        h: usize,
        t0: usize,
        c0: usize,
        c1: usize,
    },
}

impl<'a> Objective<'a> {
    /// Resolve the axis indices the chosen model reads.
    ///
    /// Missing required axes are a configuration-semantic error reported
    /// before any evaluation starts.
    pub fn bind(
        model: ModelSpec,
        bundle: &'a ReferenceBundle,
        axes: &[Axis],
    ) -> Result<Self, AppError> {
        let binding = match model {
            ModelSpec::Linear => Binding::Linear {
                h: require_axis(axes, "h", model)?,
                t0: require_axis(axes, "T0", model)?,
            },
            ModelSpec::Nonlinear => {
                if bundle.y_square.is_none() || bundle.y_cube.is_none() {
                    return Err(AppError::numeric(
                        "Reference bundle is missing the square/cube series required \
                         by the nonlinear model.",
                    ));
                }
                Binding::Nonlinear {
                    h: require_axis(axes, "h", model)?,
                    t0: require_axis(axes, "T0", model)?,
                    c0: require_axis(axes, "c0", model)?,
                    c1: require_axis(axes, "c1", model)?,
                }
            }
        };
        Ok(Self { bundle, binding })
    }

    pub fn model(&self) -> ModelSpec {
        match self.binding {
            Binding::Linear { .. } => ModelSpec::Linear,
            Binding::Nonlinear { .. } => ModelSpec::Nonlinear,
        }
    }

    /// Compute the misfit for one coordinate tuple.
    pub fn evaluate(&self, coords: &[f64]) -> Result<Misfit, AppError> {
        let b = self.bundle;
        match self.binding {
            Binding::Linear { h, t0 } => {
                let (vel_factor, disp_factor) = model_factors(coords[h], coords[t0])?;
                let mut acc = MisfitAccumulator::default();
                for j in 0..b.len() {
                    let synth =
                        b.y_dif2[j] + vel_factor * b.y_dif[j] + disp_factor * b.y[j];
                    acc.push(synth, b.calib_in[j]);
                }
                acc.finish()
            }
            Binding::Nonlinear { h, t0, c0, c1 } => {
                let (vel_factor, disp_factor) = model_factors(coords[h], coords[t0])?;
                let (c0, c1) = (coords[c0], coords[c1]);
                // Presence was checked in bind().
                let (Some(y_square), Some(y_cube)) = (&b.y_square, &b.y_cube) else {
                    return Err(AppError::numeric(
                        "Reference bundle lost its square/cube series.",
                    ));
                };
                let mut acc = MisfitAccumulator::default();
                for j in 0..b.len() {
                    let synth = b.y_dif2[j]
                        + vel_factor * b.y_dif[j]
                        + disp_factor * b.y[j]
                        + c0 * y_square[j]
                        + c1 * y_cube[j];
                    acc.push(synth, b.calib_in[j]);
                }
                acc.finish()
            }
        }
    }
}

/// `((2π/T0)·h, 4π²/T0)` with the eigenperiod guarded against zero.
fn model_factors(h: f64, t0: f64) -> Result<(f64, f64), AppError> {
    if t0 == 0.0 {
        return Err(AppError::numeric(
            "Invalid grid coordinate: eigenperiod T0 must be nonzero.",
        ));
    }
    Ok(((2.0 * PI / t0) * h, 4.0 * PI * PI / t0))
}

fn require_axis(axes: &[Axis], id: &str, model: ModelSpec) -> Result<usize, AppError> {
    axes.iter().position(|axis| axis.id == id).ok_or_else(|| {
        AppError::semantic(format!(
            "The {} model requires a '{id}' parameter but none was configured.",
            model.display_name()
        ))
    })
}

#[derive(Default)]
struct MisfitAccumulator {
    md_numerator: f64,
    md_denominator: f64,
    rms_numerator: f64,
    rms_denominator: f64,
}

impl MisfitAccumulator {
    fn push(&mut self, synth: f64, input: f64) {
        let d = (synth - input).abs();
        self.md_numerator += d;
        self.rms_numerator += d * d;
        self.md_denominator += input.abs();
        self.rms_denominator += input * input;
    }

    fn finish(self) -> Result<Misfit, AppError> {
        if self.md_denominator == 0.0 || self.rms_denominator == 0.0 {
            return Err(AppError::numeric(
                "Misfit is undefined: the calibration input series is identically zero.",
            ));
        }
        Ok(Misfit {
            md: self.md_numerator / self.md_denominator,
            rms: (self.rms_numerator / self.rms_denominator).sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Parameter;
    use crate::math;
    use crate::space::ParameterSpace;

    const DT: f64 = 0.25;

    fn output_series(n: usize) -> Vec<f64> {
        (0..n).map(|j| (0.3 * j as f64).sin()).collect()
    }

    /// Calibration input that the linear model reproduces exactly at (h, T0).
    fn linear_input(y: &[f64], h: f64, t0: f64) -> Vec<f64> {
        let y_dif = math::dif(y, DT).unwrap();
        let y_dif2 = math::dif2(y, DT).unwrap();
        let vf = (2.0 * PI / t0) * h;
        let df = 4.0 * PI * PI / t0;
        (0..y.len())
            .map(|j| y_dif2[j] + vf * y_dif[j] + df * y[j])
            .collect()
    }

    fn linear_space(h: f64, t0: f64) -> ParameterSpace {
        ParameterSpace::build(&[
            Parameter::fixed("h", h, 0.0),
            Parameter::fixed("T0", t0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn linear_model_is_exact_at_true_parameters() {
        let y = output_series(64);
        let calib_in = linear_input(&y, 0.7, 20.0);
        let bundle = ReferenceBundle::new(calib_in, y, DT, ModelSpec::Linear).unwrap();
        let space = linear_space(0.7, 20.0);
        let objective = Objective::bind(ModelSpec::Linear, &bundle, space.axes()).unwrap();

        let misfit = objective.evaluate(space.nodes()[0].coords()).unwrap();
        assert!(misfit.md < 1e-12);
        assert!(misfit.rms < 1e-12);
    }

    #[test]
    fn linear_misfit_grows_away_from_true_parameters() {
        let y = output_series(64);
        let calib_in = linear_input(&y, 0.7, 20.0);
        let bundle = ReferenceBundle::new(calib_in, y, DT, ModelSpec::Linear).unwrap();
        let space = linear_space(0.7, 20.0);
        let objective = Objective::bind(ModelSpec::Linear, &bundle, space.axes()).unwrap();

        let at_truth = objective.evaluate(&[0.7, 20.0]).unwrap();
        let off_truth = objective.evaluate(&[0.9, 15.0]).unwrap();
        assert!(off_truth.rms > at_truth.rms);
        assert!(off_truth.md > at_truth.md);
    }

    #[test]
    fn nonlinear_model_is_exact_at_true_parameters() {
        let y = output_series(64);
        let (h, t0, c0, c1) = (0.65, 18.0, 0.02, -0.01);
        let base = linear_input(&y, h, t0);
        let calib_in: Vec<f64> = base
            .iter()
            .zip(&y)
            .map(|(b, v)| b + c0 * v * v + c1 * v * v * v)
            .collect();
        let bundle = ReferenceBundle::new(calib_in, y, DT, ModelSpec::Nonlinear).unwrap();
        let space = ParameterSpace::build(&[
            Parameter::fixed("h", h, 0.0),
            Parameter::fixed("T0", t0, 0.0),
            Parameter::fixed("c0", c0, 0.0),
            Parameter::fixed("c1", c1, 0.0),
        ])
        .unwrap();
        let objective = Objective::bind(ModelSpec::Nonlinear, &bundle, space.axes()).unwrap();

        let misfit = objective.evaluate(space.nodes()[0].coords()).unwrap();
        assert!(misfit.md < 1e-12);
        assert!(misfit.rms < 1e-12);
    }

    #[test]
    fn identically_zero_input_is_a_numeric_error() {
        let y = output_series(16);
        let bundle =
            ReferenceBundle::new(vec![0.0; 16], y, DT, ModelSpec::Linear).unwrap();
        let space = linear_space(0.7, 20.0);
        let objective = Objective::bind(ModelSpec::Linear, &bundle, space.axes()).unwrap();

        let err = objective.evaluate(&[0.7, 20.0]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn zero_eigenperiod_is_a_numeric_error() {
        let y = output_series(16);
        let calib_in = linear_input(&y, 0.7, 20.0);
        let bundle = ReferenceBundle::new(calib_in, y, DT, ModelSpec::Linear).unwrap();
        let space = linear_space(0.7, 20.0);
        let objective = Objective::bind(ModelSpec::Linear, &bundle, space.axes()).unwrap();

        let err = objective.evaluate(&[0.7, 0.0]).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn missing_required_axis_is_a_semantic_error() {
        let y = output_series(16);
        let calib_in = linear_input(&y, 0.7, 20.0);
        let bundle = ReferenceBundle::new(calib_in, y, DT, ModelSpec::Linear).unwrap();
        let space = ParameterSpace::build(&[Parameter::fixed("h", 0.7, 0.0)]).unwrap();

        let err = Objective::bind(ModelSpec::Linear, &bundle, space.axes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("T0"));
    }
}
