//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - checks the output path before any computation starts
//! - runs the search pipeline
//! - writes the result table (and the optional JSON export)

use clap::Parser;

use crate::cli::Cli;
use crate::domain::RunConfig;
use crate::error::AppError;
use crate::io;

pub mod pipeline;

/// Entry point for the `calgrid` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = run_config_from_args(cli);

    // Fail before doing any work: no output file is ever overwritten by a
    // run that is not allowed to write it.
    if config.output.exists() && !config.overwrite {
        return Err(AppError::resource(format!(
            "OUTFILE '{}' exists. Specify --overwrite.",
            config.output.display()
        )));
    }

    let run = pipeline::run_search(&config)?;

    if config.verbose {
        println!("{}", crate::report::format_run_summary(&config, &run.space));
    }

    io::write_results(&config.output, &run.space)?;
    if let Some(path) = &config.export_json {
        io::write_grid_json(path, &run.space, config.model)?;
    }

    Ok(())
}

fn run_config_from_args(cli: Cli) -> RunConfig {
    let threads = cli.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(1)
    });

    RunConfig {
        model: cli.model,
        threads,
        dt: cli.dt,
        params: cli.params,
        sys_params: cli.sys_params,
        amp_param: cli.amp_param,
        del_param: cli.del_param,
        sub_param: cli.sub_param,
        til_param: cli.til_param,
        first_order: cli.first_order,
        second_order: cli.second_order,
        calib_in: cli.calib_in,
        calib_out: cli.calib_out,
        output: cli.output,
        export_json: cli.export_json,
        overwrite: cli.overwrite,
        verbose: cli.verbose,
    }
}
