//! JSON analysis configuration.
//!
//! Every field is optional; missing fields take the library defaults:
//!
//! ```json
//! {
//!   "model":   { "offset_scale": 100.0,
//!                "lower": { "a": 0.0, "b": 0.0, "c": -3.0 },
//!                "upper": { "a": 3.0, "b": 1.0, "c": 3.0 } },
//!   "solver":  { "tol_grad": 1e-8, "tol_cost": 1e-14, "max_iter": 1000,
//!                "line_searcher": "MoreThuente", "lbfgs_mem": null, "verbose": false },
//!   "initial_guess": null,
//!   "grid":    { "a": { "start": -1.0, "stop": 2.0, "step": 0.01 },
//!                "b": { "start": -1.0, "stop": 4.0, "step": 0.01 },
//!                "fixed_c": null },
//!   "reference": { "a": 0.9, "b": 0.1, "c": 0.0 }
//! }
//! ```
//!
//! [`AnalysisConfig::into_options`] validates everything and produces the
//! [`AnalysisOptions`] consumed by [`crate::report::run_analysis`].
use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::{
    coating::{CoatingError, CoatingParams, FitOptions, ModelSpec},
    landscape::{GridSpec, LandscapeError},
    optimization::{
        errors::OptError,
        lsq_optimizer::{LineSearcher, LsqOptions, Tolerances},
    },
    report::AnalysisOptions,
};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Malformed JSON or wrong field types.
    Parse { message: String },
    /// Solver settings rejected.
    Solver(OptError),
    /// Model specification or initial guess rejected.
    Model(CoatingError),
    /// Grid specification rejected.
    Grid(LandscapeError),
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Parse { message } => write!(f, "Failed to parse configuration: {message}"),
            ConfigError::Solver(err) => write!(f, "Invalid solver configuration: {err}"),
            ConfigError::Model(err) => write!(f, "Invalid model configuration: {err}"),
            ConfigError::Grid(err) => write!(f, "Invalid grid configuration: {err}"),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse { message: err.to_string() }
    }
}

impl From<OptError> for ConfigError {
    fn from(err: OptError) -> Self {
        ConfigError::Solver(err)
    }
}

impl From<CoatingError> for ConfigError {
    fn from(err: CoatingError) -> Self {
        ConfigError::Model(err)
    }
}

impl From<LandscapeError> for ConfigError {
    fn from(err: LandscapeError) -> Self {
        ConfigError::Grid(err)
    }
}

/// Solver section. `null` tolerances disable that stopping rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
    /// Case-insensitive `"MoreThuente"` or `"HagerZhang"`.
    pub line_searcher: String,
    pub lbfgs_mem: Option<usize>,
    pub verbose: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let tols = Tolerances::default();
        Self {
            tol_grad: tols.tol_grad,
            tol_cost: tols.tol_cost,
            max_iter: tols.max_iter,
            line_searcher: "MoreThuente".to_string(),
            lbfgs_mem: None,
            verbose: false,
        }
    }
}

impl SolverConfig {
    pub fn to_options(&self) -> ConfigResult<LsqOptions> {
        let tols = Tolerances::new(self.tol_grad, self.tol_cost, self.max_iter)?;
        let line_searcher: LineSearcher = self.line_searcher.parse()?;
        Ok(LsqOptions::new(tols, line_searcher, self.verbose, self.lbfgs_mem)?)
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub model: ModelSpec,
    pub solver: SolverConfig,
    pub initial_guess: Option<CoatingParams>,
    pub grid: GridSpec,
    pub reference: CoatingParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            model: ModelSpec::default(),
            solver: SolverConfig::default(),
            initial_guess: None,
            grid: GridSpec::default(),
            reference: CoatingParams::REFERENCE,
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(source: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> ConfigResult<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Validate and convert into pipeline options.
    ///
    /// # Errors
    /// The first invalid section, wrapped in the matching [`ConfigError`]
    /// variant.
    pub fn into_options(self) -> ConfigResult<AnalysisOptions> {
        let lsq = self.solver.to_options()?;
        let fit = FitOptions::new(self.model, lsq, self.initial_guess)?;
        self.grid.validate()?;
        if !self.reference.is_finite() {
            return Err(ConfigError::Model(CoatingError::InvalidModelSpec {
                reason: format!("reference parameters {} must be finite", self.reference),
            }));
        }
        Ok(AnalysisOptions { fit, grid: self.grid, reference: self.reference })
    }
}
