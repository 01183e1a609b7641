//! coating_fit — coating-weight estimation for confectionery moulds.
//!
//! Purpose
//! -------
//! Fit the three-parameter physical model `v = A·x0 − B·x1 + 100·C` that
//! predicts how much shell-coating material a mould configuration needs,
//! from the cavity geometry in a mould catalog and a small set of recorded
//! recipes, and produce the diagnostics needed to judge that fit.
//!
//! Key behaviors
//! -------------
//! - [`catalog`] loads the immutable mould catalog and resolves references by
//!   name or model code.
//! - [`coating`] turns recipes into `(x0, x1)` features and targets, holds
//!   the model, and runs the absolute-error and relative-error fits.
//! - [`landscape`] scans `score(A, B | C)` over a rectangular grid.
//! - [`report`] runs the whole pipeline and assembles a serializable
//!   [`report::DiagnosticReport`].
//! - [`optimization`] is the bounded least-squares engine (argmin L-BFGS over
//!   a logistic box transform); [`inference`] adds covariance estimates at
//!   the fitted point.
//! - [`config`] reads optional JSON settings into validated options.
//!
//! Invariants & assumptions
//! ------------------------
//! - The catalog is read-only once built and is passed explicitly.
//! - Fitted parameters always lie inside their configured bounds.
//! - Degenerate recipes (no moulds, zero target, all-zero features) are
//!   rejected before any solver runs.
//!
//! Conventions
//! -----------
//! - Parameters are ordered `(A, B, C)` everywhere.
//! - Each layer has its own error enum; conversions happen at layer
//!   boundaries and library code never panics on bad input.
//! - Logging goes through the `log` facade; the binary decides the sink.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/integration_fit_pipeline.rs`
//!   drives catalog → features → fits → landscape → report end to end.

pub mod catalog;
pub mod coating;
pub mod config;
pub mod inference;
pub mod landscape;
pub mod optimization;
pub mod report;

pub mod prelude {
    pub use crate::catalog::{CatalogError, Cavity, Mould, MouldCatalog};
    pub use crate::coating::{
        CoatingError, CoatingParams, FeatureMatrix, Features, FitOptions, FitPair, FitResult,
        ModelSpec, Objective, Recipe, RecipeSet, extract_features, fit_both, fit_objective,
        predict_configuration, score,
    };
    pub use crate::config::{AnalysisConfig, ConfigError};
    pub use crate::landscape::{GridAxis, GridSpec, LandscapeGrid, scan, summarize};
    pub use crate::report::{AnalysisOptions, DiagnosticReport, run_analysis};
}
