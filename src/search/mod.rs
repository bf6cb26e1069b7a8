//! The grid-search engine.
//!
//! Dispatches the objective over every node of the parameter space exactly
//! once, in parallel over a fixed-size worker pool. Node evaluations are
//! independent of each other, so no ordering or coordination is needed beyond
//! the final join; result determinism comes from the evaluation itself, not
//! from scheduling.
//!
//! Each node's result slot is written by exactly one worker, enforced by
//! handing out disjoint `&mut Node` partitions rather than by locking. On the
//! first evaluation error the whole run aborts and the error propagates to
//! the caller; partially filled spaces are discarded, never written out.

use rayon::prelude::*;

use crate::error::AppError;
use crate::objective::Objective;
use crate::space::ParameterSpace;

/// Evaluate every node of `space` with `objective` on `workers` threads.
///
/// All workers are joined before this returns: on `Ok(())` every node carries
/// a computed result. Running with one worker is observably equivalent to any
/// larger worker count.
pub fn execute(
    space: &mut ParameterSpace,
    objective: &Objective<'_>,
    workers: usize,
) -> Result<(), AppError> {
    if workers == 0 {
        return Err(AppError::semantic("Worker count must be at least 1."));
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| AppError::semantic(format!("Failed to build worker pool: {e}")))?;

    pool.install(|| {
        space.nodes_mut().par_iter_mut().try_for_each(|node| {
            let misfit = objective.evaluate(node.coords())?;
            node.set_result(misfit);
            Ok(())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Misfit, ModelSpec, Parameter};
    use crate::math;
    use crate::objective::ReferenceBundle;

    use std::f64::consts::PI;

    const DT: f64 = 0.25;

    fn output_series(n: usize) -> Vec<f64> {
        (0..n).map(|j| (0.3 * j as f64).sin()).collect()
    }

    fn linear_input(y: &[f64], h: f64, t0: f64) -> Vec<f64> {
        let y_dif = math::dif(y, DT).unwrap();
        let y_dif2 = math::dif2(y, DT).unwrap();
        let vf = (2.0 * PI / t0) * h;
        let df = 4.0 * PI * PI / t0;
        (0..y.len())
            .map(|j| y_dif2[j] + vf * y_dif[j] + df * y[j])
            .collect()
    }

    fn search_parameters() -> Vec<Parameter> {
        vec![
            Parameter::swept("h", 0.60, 0.80, 0.05, 0.0),
            Parameter::swept("T0", 19.0, 21.0, 0.5, 0.0),
        ]
    }

    fn run(workers: usize, calib_in: Vec<f64>, y: Vec<f64>) -> Result<Vec<Misfit>, AppError> {
        let bundle = ReferenceBundle::new(calib_in, y, DT, ModelSpec::Linear)?;
        let mut space = ParameterSpace::build(&search_parameters())?;
        let objective = Objective::bind(ModelSpec::Linear, &bundle, space.axes())?;
        execute(&mut space, &objective, workers)?;
        Ok(space
            .nodes()
            .iter()
            .map(|n| *n.result().unwrap())
            .collect())
    }

    #[test]
    fn every_node_is_computed_exactly_once() {
        let y = output_series(64);
        let calib_in = linear_input(&y, 0.7, 20.0);
        let bundle = ReferenceBundle::new(calib_in, y, DT, ModelSpec::Linear).unwrap();
        let mut space = ParameterSpace::build(&search_parameters()).unwrap();
        let objective = Objective::bind(ModelSpec::Linear, &bundle, space.axes()).unwrap();

        execute(&mut space, &objective, 2).unwrap();
        assert!(space.is_fully_computed());
        assert_eq!(space.len(), 25);
    }

    #[test]
    fn results_are_identical_for_worker_counts_1_2_and_8() {
        let y = output_series(64);
        let calib_in = linear_input(&y, 0.7, 20.0);

        let single = run(1, calib_in.clone(), y.clone()).unwrap();
        for workers in [2, 8] {
            let parallel = run(workers, calib_in.clone(), y.clone()).unwrap();
            assert_eq!(single.len(), parallel.len());
            for (a, b) in single.iter().zip(&parallel) {
                assert_eq!(a.md, b.md, "md differs at {workers} workers");
                assert_eq!(a.rms, b.rms, "rms differs at {workers} workers");
            }
        }
    }

    #[test]
    fn evaluation_error_aborts_the_whole_run() {
        // Identically-zero calibration input makes every node fail.
        let y = output_series(64);
        let err = run(4, vec![0.0; 64], y).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn zero_workers_are_rejected() {
        let y = output_series(64);
        let calib_in = linear_input(&y, 0.7, 20.0);
        let err = run(0, calib_in, y).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
