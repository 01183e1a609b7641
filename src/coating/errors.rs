//! Errors for the coating-weight estimator (dataset validation, mould
//! lookup, model configuration and fit failures).
//!
//! ## Conventions
//! - Recipe indices are **0-based** positions in the supplied dataset.
//! - Recipes are named by their `note` (or `"?"` when absent) so messages
//!   point at something a person recorded.
//! - Optimizer/backend errors keep the [`Objective`] that failed.
use crate::{
    catalog::CatalogError, coating::objective::Objective, inference::InferenceError,
    landscape::LandscapeError, optimization::errors::OptError,
};

/// Result alias for estimator operations.
pub type CoatingResult<T> = Result<T, CoatingError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CoatingError {
    // ---- Dataset validation ----
    /// No recipes were supplied.
    EmptyDataset,

    /// The recipe source could not be parsed.
    Parse { message: String },

    /// A recipe references a mould that does not resolve to exactly one
    /// catalog entry.
    UnknownMould { recipe: usize, note: String, source: CatalogError },

    /// A recipe would put a zero or non-finite value into the fit.
    DegenerateInput { recipe: usize, note: String, reason: &'static str },

    /// Recorded weight must be finite and > 0.
    InvalidWeight { recipe: usize, value: f64 },

    /// Relation must be finite and > 0.
    InvalidRelation { recipe: usize, value: f64 },

    /// Feature matrix and targets do not line up.
    FeatureShapeMismatch { rows: usize, cols: usize, targets: usize },

    // ---- Model configuration ----
    /// Offset scale, bounds or parameter vector are unusable.
    InvalidModelSpec { reason: String },

    /// Mould lookup outside of a recipe (e.g. ad hoc predictions).
    Catalog(CatalogError),

    // ---- Fitting ----
    /// The solver stopped without meeting its tolerances.
    ConvergenceFailed { objective: Objective, status: String },

    /// The solver raised an error.
    Optimizer { objective: Objective, source: OptError },

    /// Covariance estimation failed.
    Inference(InferenceError),

    // ---- Diagnostics ----
    /// Loss landscape configuration or evaluation failed.
    Landscape(LandscapeError),
}

impl std::error::Error for CoatingError {}

impl std::fmt::Display for CoatingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Dataset validation ----
            CoatingError::EmptyDataset => {
                write!(f, "Recipe dataset is empty.")
            }
            CoatingError::Parse { message } => {
                write!(f, "Failed to parse recipe dataset: {message}")
            }
            CoatingError::UnknownMould { recipe, note, source } => {
                write!(f, "Recipe {recipe} ('{note}'): {source}")
            }
            CoatingError::DegenerateInput { recipe, note, reason } => {
                write!(f, "Recipe {recipe} ('{note}') is degenerate: {reason}")
            }
            CoatingError::InvalidWeight { recipe, value } => {
                write!(f, "Recipe {recipe} has weight {value}; must be finite and > 0")
            }
            CoatingError::InvalidRelation { recipe, value } => {
                write!(f, "Recipe {recipe} has relation {value}; must be finite and > 0")
            }
            CoatingError::FeatureShapeMismatch { rows, cols, targets } => {
                write!(
                    f,
                    "Feature matrix is {rows}x{cols} but {targets} targets were given; expected Nx2 with N targets"
                )
            }
            // ---- Model configuration ----
            CoatingError::InvalidModelSpec { reason } => {
                write!(f, "Invalid model specification: {reason}")
            }
            CoatingError::Catalog(err) => {
                write!(f, "{err}")
            }
            // ---- Fitting ----
            CoatingError::ConvergenceFailed { objective, status } => {
                write!(f, "The {objective} fit did not converge: {status}")
            }
            CoatingError::Optimizer { objective, source } => {
                write!(f, "The {objective} fit failed: {source}")
            }
            CoatingError::Inference(err) => {
                write!(f, "{err}")
            }
            // ---- Diagnostics ----
            CoatingError::Landscape(err) => {
                write!(f, "{err}")
            }
        }
    }
}

impl From<CatalogError> for CoatingError {
    fn from(err: CatalogError) -> Self {
        CoatingError::Catalog(err)
    }
}

impl From<InferenceError> for CoatingError {
    fn from(err: InferenceError) -> Self {
        CoatingError::Inference(err)
    }
}

impl From<LandscapeError> for CoatingError {
    fn from(err: LandscapeError) -> Self {
        CoatingError::Landscape(err)
    }
}

impl From<serde_json::Error> for CoatingError {
    fn from(err: serde_json::Error) -> Self {
        CoatingError::Parse { message: err.to_string() }
    }
}
