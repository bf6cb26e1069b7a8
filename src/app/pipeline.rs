//! The shared search pipeline.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! token parsing -> series loading -> bundle -> grid -> search
//!
//! The CLI front-end then only handles presentation and file writing.

use crate::domain::{Parameter, RunConfig};
use crate::error::AppError;
use crate::grammar;
use crate::io;
use crate::objective::{Objective, ReferenceBundle};
use crate::search;
use crate::space::ParameterSpace;

/// All computed outputs of a single run.
#[derive(Debug)]
pub struct RunOutput {
    pub space: ParameterSpace,
    pub parameters: Vec<Parameter>,
}

/// Execute the full search pipeline and return the populated grid.
pub fn run_search(config: &RunConfig) -> Result<RunOutput, AppError> {
    // 1) Parse all configuration tokens and fix the axis order.
    let parameters = collect_parameters(config)?;

    // 2) Load the recorded series and precompute the reference bundle.
    let calib_in = io::read_series(&config.calib_in)?;
    let calib_out = io::read_series(&config.calib_out)?;
    let bundle = ReferenceBundle::new(calib_in, calib_out, config.dt, config.model)?;

    // 3) Materialize the grid and bind the objective to its axes.
    let mut space = ParameterSpace::build(&parameters)?;
    let objective = Objective::bind(config.model, &bundle, space.axes())?;

    // 4) Evaluate every node.
    search::execute(&mut space, &objective, config.threads)?;

    Ok(RunOutput { space, parameters })
}

/// Parse and order all configured parameters.
///
/// Axis order is fixed here: model coefficients first (in the given order),
/// then the obligatory parameters, additional system parameters, and finally
/// subsystem members in (period, damping) order. Duplicate ids resolve
/// first-wins.
pub fn collect_parameters(config: &RunConfig) -> Result<Vec<Parameter>, AppError> {
    let mut parameters = Vec::new();

    for token in &config.params {
        parameters.push(grammar::parse_parameter(token)?);
    }

    let obligatory = [
        (&config.amp_param, "amp"),
        (&config.del_param, "del"),
        (&config.sub_param, "sub"),
        (&config.til_param, "til"),
    ];
    for (token, id) in obligatory {
        if let Some(token) = token {
            parameters.push(grammar::parse_obligatory(token, id)?);
        }
    }

    for token in &config.sys_params {
        let param = grammar::parse_system_parameter(token)?;
        if param.is_obligatory() {
            return Err(AppError::semantic(format!(
                "System parameter id '{0}' is reserved; use --{0}-param instead.",
                param.id
            )));
        }
        parameters.push(param);
    }

    for token in &config.first_order {
        let subsystem = grammar::parse_first_order(token)?;
        parameters.extend(subsystem.parameters().cloned());
    }
    for token in &config.second_order {
        let subsystem = grammar::parse_second_order(token)?;
        parameters.extend(subsystem.parameters().cloned());
    }

    let parameters = dedupe_first_wins(parameters);

    if !parameters.iter().any(Parameter::is_swept) {
        return Err(AppError::semantic("No grid (swept) parameters specified."));
    }

    Ok(parameters)
}

/// Keep the first occurrence of every id, drop later duplicates silently.
fn dedupe_first_wins(parameters: Vec<Parameter>) -> Vec<Parameter> {
    let mut out: Vec<Parameter> = Vec::with_capacity(parameters.len());
    for param in parameters {
        if !out.iter().any(|p| p.id == param.id) {
            out.push(param);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelSpec, ParamKind};
    use std::path::PathBuf;

    fn base_config() -> RunConfig {
        RunConfig {
            model: ModelSpec::Linear,
            threads: 1,
            dt: 1.0,
            params: vec![
                "h|0.6;0.8;0.05|0.0".to_string(),
                "T0|20.0|0.0".to_string(),
            ],
            sys_params: Vec::new(),
            amp_param: None,
            del_param: None,
            sub_param: None,
            til_param: None,
            first_order: Vec::new(),
            second_order: Vec::new(),
            calib_in: PathBuf::from("in.asc"),
            calib_out: PathBuf::from("out.asc"),
            output: PathBuf::from("result.txt"),
            export_json: None,
            overwrite: false,
            verbose: false,
        }
    }

    #[test]
    fn parameters_keep_supply_order() {
        let mut config = base_config();
        config.amp_param = Some("1.0|0.0".to_string());
        config.sys_params = vec!["gai|2.0|0.1".to_string()];
        config.first_order = vec!["HP|per|19.6;20.0;0.2|0.0".to_string()];

        let parameters = collect_parameters(&config).unwrap();
        let ids: Vec<&str> = parameters.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["h", "T0", "amp", "gai", "per"]);
    }

    #[test]
    fn duplicate_ids_resolve_first_wins() {
        let mut config = base_config();
        config.params.push("h|0.1;0.2;0.1|0.0".to_string());

        let parameters = collect_parameters(&config).unwrap();
        let h: Vec<&Parameter> = parameters.iter().filter(|p| p.id == "h").collect();
        assert_eq!(h.len(), 1);
        assert_eq!(
            h[0].kind,
            ParamKind::Swept {
                start: 0.6,
                end: 0.8,
                delta: 0.05
            }
        );
    }

    #[test]
    fn reserved_ids_are_rejected_as_sys_params() {
        let mut config = base_config();
        config.sys_params = vec!["amp|1.0|0.0".to_string()];

        let err = collect_parameters(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn all_fixed_configuration_is_a_semantic_error() {
        let mut config = base_config();
        config.params = vec!["h|0.7|0.0".to_string(), "T0|20.0|0.0".to_string()];

        let err = collect_parameters(&config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.to_string().contains("No grid"));
    }

    #[test]
    fn malformed_token_fails_collection() {
        let mut config = base_config();
        config.params.push("c0-0.1;0.1;0.05|0.0".to_string());

        let err = collect_parameters(&config).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn full_pipeline_runs_on_temporary_series_files() {
        let dir = std::env::temp_dir().join(format!("calgrid-pipeline-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let in_path = dir.join("in.asc");
        let out_path = dir.join("out.asc");

        // Output series plus an input that is not identically zero.
        let y: Vec<f64> = (0..48).map(|j| (0.3 * j as f64).sin()).collect();
        let a: Vec<f64> = y.iter().map(|v| v + 2.0).collect();
        let to_text = |s: &[f64]| {
            s.iter()
                .map(|v| format!("{v:.12}"))
                .collect::<Vec<_>>()
                .join("\n")
        };
        std::fs::write(&in_path, to_text(&a)).unwrap();
        std::fs::write(&out_path, to_text(&y)).unwrap();

        let mut config = base_config();
        config.calib_in = in_path;
        config.calib_out = out_path;
        config.threads = 2;

        let run = run_search(&config).unwrap();
        assert_eq!(run.space.len(), 5);
        assert!(run.space.is_fully_computed());

        std::fs::remove_dir_all(&dir).ok();
    }
}
