//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during the grid search
//! - exported to JSON alongside the result table
//! - echoed back in the run summary

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Reserved ids with special handling semantics in the calibration domain.
///
/// A parameter carrying one of these ids configures an obligatory system
/// parameter; free ids describe additional system parameters or model
/// coefficients.
pub const OBLIGATORY_IDS: [&str; 4] = ["amp", "del", "sub", "til"];

/// How a parameter contributes to the search grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamKind {
    /// Held at a single value for the whole search.
    Fixed { value: f64 },
    /// Scanned over `start + k*delta` up to and including `end` (when aligned).
    Swept { start: f64, end: f64, delta: f64 },
}

/// One axis of the search: a named, fixed or swept scalar with an uncertainty.
///
/// An uncertainty of zero marks a fixed parameter as non-active (it is carried
/// through the run but not calibrated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub uncertainty: f64,
    pub kind: ParamKind,
}

impl Parameter {
    pub fn fixed(id: impl Into<String>, value: f64, uncertainty: f64) -> Self {
        Self {
            id: id.into(),
            uncertainty,
            kind: ParamKind::Fixed { value },
        }
    }

    pub fn swept(id: impl Into<String>, start: f64, end: f64, delta: f64, uncertainty: f64) -> Self {
        Self {
            id: id.into(),
            uncertainty,
            kind: ParamKind::Swept { start, end, delta },
        }
    }

    /// Whether this parameter spans a scanning range (a grid parameter).
    pub fn is_swept(&self) -> bool {
        matches!(self.kind, ParamKind::Swept { .. })
    }

    /// Whether this parameter uses one of the reserved obligatory ids.
    pub fn is_obligatory(&self) -> bool {
        OBLIGATORY_IDS.contains(&self.id.as_str())
    }
}

/// Re-serialize to the configuration-token form accepted by the grammar.
///
/// Round-trips on the typed fields, not necessarily on the literal string.
impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ParamKind::Fixed { value } => {
                write!(f, "{}|{}|{}", self.id, value, self.uncertainty)
            }
            ParamKind::Swept { start, end, delta } => {
                write!(f, "{}|{};{};{}|{}", self.id, start, end, delta, self.uncertainty)
            }
        }
    }
}

/// Filter type of a subsystem stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Lp,
    Hp,
    Bp,
}

impl FilterKind {
    /// The fixed-length token used by the configuration grammar.
    pub fn token(self) -> &'static str {
        match self {
            FilterKind::Lp => "LP",
            FilterKind::Hp => "HP",
            FilterKind::Bp => "BP",
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            FilterKind::Lp => "low-pass",
            FilterKind::Hp => "high-pass",
            FilterKind::Bp => "band-pass",
        }
    }
}

/// A first- or second-order filter stage built from system parameters.
///
/// First-order subsystems carry a period parameter only; second-order
/// subsystems additionally carry a damping parameter. Band-pass is only
/// meaningful for second-order stages; the grammar enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subsystem {
    pub kind: FilterKind,
    pub period: Parameter,
    pub damping: Option<Parameter>,
}

impl Subsystem {
    pub fn order(&self) -> u8 {
        if self.damping.is_some() { 2 } else { 1 }
    }

    /// The subsystem's parameters in positional (period, damping) order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        std::iter::once(&self.period).chain(self.damping.as_ref())
    }
}

/// Which instrument model the objective evaluates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ModelSpec {
    /// `y'' + ((2π/T0)·h)·y' + (4π²/T0)·y = a`
    Linear,
    /// Linear model plus `c0·y²` and `c1·y³` terms.
    Nonlinear,
}

impl ModelSpec {
    pub fn display_name(self) -> &'static str {
        match self {
            ModelSpec::Linear => "linear",
            ModelSpec::Nonlinear => "nonlinear",
        }
    }
}

/// Per-node misfit between the synthesized model series and the calibration
/// input series. Computed exactly once per node; read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Misfit {
    /// Mean absolute difference normalized by the summed absolute input.
    pub md: f64,
    /// Root-mean-square difference normalized by the summed squared input.
    pub rms: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// Parameter and subsystem fields hold raw grammar tokens; the pipeline parses
/// them so that all syntax errors surface through one code path.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub model: ModelSpec,
    pub threads: usize,
    /// Sampling interval of both input series, in seconds.
    pub dt: f64,

    /// Model coefficient tokens (`h`, `T0`, `c0`, `c1`).
    pub params: Vec<String>,
    /// Additional system parameter tokens (three-letter ids).
    pub sys_params: Vec<String>,
    pub amp_param: Option<String>,
    pub del_param: Option<String>,
    pub sub_param: Option<String>,
    pub til_param: Option<String>,
    pub first_order: Vec<String>,
    pub second_order: Vec<String>,

    pub calib_in: PathBuf,
    pub calib_out: PathBuf,
    pub output: PathBuf,
    pub export_json: Option<PathBuf>,

    pub overwrite: bool,
    pub verbose: bool,
}
