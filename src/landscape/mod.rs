//! landscape — score surface over `(A, B)` at fixed `C`.
//!
//! Purpose
//! -------
//! Evaluate the fit score on a regular grid of the first two parameters so
//! a fitted point can be checked against the surface: is it in the global
//! basin, is the surface flat along some direction, are there several
//! minima. No optimization happens here.
//!
//! Key behaviors
//! -------------
//! - [`GridAxis`] / [`GridSpec`] describe half-open sampled ranges, default
//!   `A ∈ [−1, 2)`, `B ∈ [−1, 4)`, step `0.01`.
//! - [`scan`] fills a `(len(A), len(B))` array with
//!   [`crate::coating::score`]; the optional `parallel` feature spreads rows
//!   over rayon.
//! - [`summarize`] extracts extremes, the grid argmin, contour levels and
//!   the distance of a fitted point to the minimum.
//!
//! Invariants & assumptions
//! ------------------------
//! - The scan and the fitter share one score definition.
//! - Cells may be `−inf` where the model reproduces every target exactly.

pub mod errors;
pub mod grid;
pub mod scan;

pub use self::errors::{LandscapeError, LandscapeResult};
pub use self::grid::{GridAxis, GridSpec, MAX_GRID_CELLS};
pub use self::scan::{
    BASIN_WARN_DISTANCE, CONTOUR_STEP, LandscapeGrid, LandscapeSummary, scan, summarize,
};
