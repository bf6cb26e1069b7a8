//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! search/math code: flags are collected here, turned into a `RunConfig` by
//! `app`, and all grammar tokens are parsed later by one code path in the
//! pipeline so syntax errors surface uniformly.

use std::path::PathBuf;

use clap::Parser;

use crate::domain::ModelSpec;

const GRAMMAR_NOTES: &str = "\
Parameter token syntax:
  A parameter is written as 'nam|val|unc' where 'nam' is its id, 'val' its
  value and 'unc' its uncertainty (zero marks the parameter as non-active).
  A parameter scanned by the grid search uses 'nam|start;end;delta|unc'
  instead: the value field is sampled from 'start' to 'end' in steps of
  'delta'. System parameter ids are exactly three letters; the ids 'amp',
  'del', 'sub' and 'til' are reserved for the obligatory parameters and take
  the value-only form 'val|unc'. Model coefficients ('h', 'T0', 'c0', 'c1')
  use free-form ids.

Subsystem token syntax:
  First-order:  TYPE|nam|val|unc            TYPE in {LP, HP}
  Second-order: TYPE|nam1|val1|unc1|nam2|val2|unc2   TYPE in {LP, HP, BP}
  Either value field may independently use the swept form. Separators must
  be passed exactly as shown.

If two parameters share the same id, the first occurrence wins.";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "calgrid",
    version,
    about = "Grid-search calibration of instrument-response models",
    after_long_help = GRAMMAR_NOTES
)]
pub struct Cli {
    /// Print a run summary to stdout.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Overwrite OUTFILE if it exists.
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Number of worker threads (default: available hardware parallelism).
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Which instrument model to calibrate.
    #[arg(long, value_enum, default_value_t = ModelSpec::Nonlinear)]
    pub model: ModelSpec,

    /// Model coefficient to search for ('id|start;end;delta|unc').
    #[arg(short = 'p', long = "param", value_name = "TOKEN")]
    pub params: Vec<String>,

    /// Additional system parameter ('nam|val|unc', three-letter id).
    #[arg(long = "sys-param", value_name = "TOKEN")]
    pub sys_params: Vec<String>,

    /// Configure the amplitude 'amp' parameter ('val|unc').
    #[arg(long = "amp-param", value_name = "TOKEN")]
    pub amp_param: Option<String>,

    /// Configure the delay 'del' parameter ('val|unc').
    #[arg(long = "del-param", value_name = "TOKEN", conflicts_with = "sub_param")]
    pub del_param: Option<String>,

    /// Configure the substitute-delay 'sub' parameter ('val|unc').
    #[arg(long = "sub-param", value_name = "TOKEN")]
    pub sub_param: Option<String>,

    /// Configure the tilt 'til' parameter ('val|unc').
    #[arg(long = "til-param", value_name = "TOKEN")]
    pub til_param: Option<String>,

    /// Add a first-order subsystem ('TYPE|nam|val|unc').
    #[arg(long = "first-order", value_name = "TOKEN")]
    pub first_order: Vec<String>,

    /// Add a second-order subsystem ('TYPE|nam1|val1|unc1|nam2|val2|unc2').
    #[arg(long = "second-order", value_name = "TOKEN")]
    pub second_order: Vec<String>,

    /// Sampling interval of both input series, in seconds.
    #[arg(long, default_value_t = 1.0)]
    pub dt: f64,

    /// Filepath of the calibration input signal file.
    #[arg(long = "calib-in", value_name = "FILE")]
    pub calib_in: PathBuf,

    /// Filepath of the calibration output signal file.
    #[arg(long = "calib-out", value_name = "FILE")]
    pub calib_out: PathBuf,

    /// Additionally export the populated grid as JSON.
    #[arg(long = "export-json", value_name = "FILE")]
    pub export_json: Option<PathBuf>,

    /// Filepath of the result file.
    #[arg(value_name = "OUTFILE")]
    pub output: PathBuf,
}
