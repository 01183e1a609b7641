//! Grid evaluation of the score surface and its summary.
//!
//! Every cell `(i, j)` holds `score(A_i, B_j, C)` computed with
//! [`crate::coating::score`], the same function the fitter reports. Cells are
//! independent; with the `parallel` feature the A rows are spread over the
//! rayon pool and the result is identical to the sequential scan.
use log::{info, warn};
use ndarray::{Array1, Array2};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    coating::{CoatingParams, FeatureMatrix, ModelSpec, score},
    landscape::{errors::LandscapeResult, grid::GridSpec},
};

/// Spacing of contour levels.
pub const CONTOUR_STEP: f64 = 0.1;

/// A fitted point further than this from the grid minimum (in `(A, B)`
/// units) is logged as a possible separate basin.
pub const BASIN_WARN_DISTANCE: f64 = 0.1;

/// Score surface over `(A, B)` at fixed `C`.
///
/// `scores` has shape `(len(A), len(B))`; `scores[[i, j]]` is the score at
/// `(a_values[i], b_values[j], c)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LandscapeGrid {
    pub spec: GridSpec,
    pub a_values: Array1<f64>,
    pub b_values: Array1<f64>,
    pub c: f64,
    pub scores: Array2<f64>,
}

/// Scan the score surface.
///
/// # Errors
/// Grid validation failures (see [`GridSpec::validate`]).
pub fn scan(
    data: &FeatureMatrix, model: &ModelSpec, grid: &GridSpec, c: f64,
) -> LandscapeResult<LandscapeGrid> {
    let spec = GridSpec { fixed_c: Some(c), ..*grid };
    spec.validate()?;
    let a_values = spec.a.values();
    let b_values = spec.b.values();

    let row = |&a: &f64| -> Vec<f64> {
        b_values.iter().map(|&b| score(data, &CoatingParams::new(a, b, c), model)).collect()
    };

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = a_values.to_vec().par_iter().map(row).collect();

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = a_values.iter().map(row).collect();

    let mut scores = Array2::<f64>::zeros((a_values.len(), b_values.len()));
    for (mut dst, src) in scores.rows_mut().into_iter().zip(rows) {
        dst.assign(&Array1::from(src));
    }
    Ok(LandscapeGrid { spec, a_values, b_values, c, scores })
}

impl LandscapeGrid {
    pub fn shape(&self) -> (usize, usize) {
        self.scores.dim()
    }

    /// Score at `(a_values[i], b_values[j])`.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.scores.get([i, j]).copied()
    }
}

/// Aggregate view of a scanned grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LandscapeSummary {
    pub min_score: f64,
    pub max_score: f64,
    /// `(A, B)` of the lowest cell.
    pub argmin: (f64, f64),
    /// `min, min + 0.1, …` below `max`; empty when either end is infinite.
    pub levels: Vec<f64>,
    /// Euclidean `(A, B)` distance from the fitted point to `argmin`.
    pub fit_distance: Option<f64>,
    /// Whether the fitted point lies inside the scanned ranges.
    pub fit_inside: Option<bool>,
}

/// Summarize a grid, optionally against a fitted point.
///
/// `NaN` cells are skipped. Logs the extremes, and warns when the fitted
/// point lies outside the grid or away from its minimum.
pub fn summarize(grid: &LandscapeGrid, fitted: Option<&CoatingParams>) -> LandscapeSummary {
    let mut min_score = f64::INFINITY;
    let mut max_score = f64::NEG_INFINITY;
    let mut argmin = (f64::NAN, f64::NAN);
    for ((i, j), &s) in grid.scores.indexed_iter() {
        if s.is_nan() {
            continue;
        }
        if s < min_score {
            min_score = s;
            argmin = (grid.a_values[i], grid.b_values[j]);
        }
        max_score = max_score.max(s);
    }

    let levels = contour_levels(min_score, max_score);
    let fit_inside = fitted.map(|p| grid.spec.a.covers(p.a) && grid.spec.b.covers(p.b));
    let fit_distance = fitted.map(|p| (p.a - argmin.0).hypot(p.b - argmin.1));

    info!(
        "landscape at C = {:.4}: score in [{min_score:.4}, {max_score:.4}], minimum at A = {:.2}, B = {:.2}",
        grid.c, argmin.0, argmin.1
    );
    if fit_inside == Some(false) {
        warn!("fitted point lies outside the scanned landscape");
    }
    if let Some(d) = fit_distance {
        if d > BASIN_WARN_DISTANCE {
            warn!("fitted point is {d:.3} away from the landscape minimum; check for another basin");
        }
    }
    LandscapeSummary { min_score, max_score, argmin, levels, fit_distance, fit_inside }
}

/// `min, min + step, …` strictly below `max`.
fn contour_levels(min: f64, max: f64) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min {
        return Vec::new();
    }
    let n = ((max - min) / CONTOUR_STEP).ceil() as usize;
    (0..n).map(|k| min + k as f64 * CONTOUR_STEP).filter(|&l| l < max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landscape::grid::GridAxis;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Grid shape and spot values against the closed-form score.
    // - Summary extremes, argmin and contour levels.
    // - Basin distance of a fitted point.
    // - The rayon scan agreeing cell by cell with direct evaluation.
    // -------------------------------------------------------------------------

    fn unit_grid() -> GridSpec {
        GridSpec {
            a: GridAxis { start: -1.0, stop: 2.0, step: 1.0 },
            b: GridAxis { start: -1.0, stop: 4.0, step: 1.0 },
            fixed_c: None,
        }
    }

    fn single() -> FeatureMatrix {
        FeatureMatrix::new(array![[100.0, 27.14]], array![100.0]).expect("valid")
    }

    /// `log10((a·100 − b·27.14 + 100·c)/100 − 1)²`.
    fn closed_form(a: f64, b: f64, c: f64) -> f64 {
        let ratio = (a * 100.0 - b * 27.14 + 100.0 * c) / 100.0;
        ((ratio - 1.0) * (ratio - 1.0)).log10()
    }

    #[test]
    // Purpose
    // -------
    // Unit-step grid over one recipe is 3×5 and matches the closed form.
    //
    // Given
    // -----
    // - `x0 = 100, x1 = 27.14, target = 100`, `C = 0`.
    //
    // Expect
    // ------
    // - Shape `(3, 5)`.
    // - `scores[[0, 0]]` at `(−1, −1)`: ratio `−0.7286`.
    // - `scores[[2, 1]]` at `(1, 0)`: ratio `1`, score `−inf`.
    fn unit_grid_matches_closed_form() {
        // Act
        let grid = scan(&single(), &ModelSpec::default(), &unit_grid(), 0.0).expect("scan");

        // Assert
        assert_eq!(grid.shape(), (3, 5));
        assert_relative_eq!(grid.scores[[0, 0]], closed_form(-1.0, -1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(grid.scores[[0, 0]], (1.7286f64 * 1.7286).log10(), epsilon = 1e-12);
        assert_relative_eq!(grid.scores[[1, 3]], closed_form(0.0, 2.0, 0.0), epsilon = 1e-12);
        assert_eq!(grid.scores[[2, 1]], f64::NEG_INFINITY);
        assert_eq!(grid.get(3, 0), None);
    }

    #[test]
    // Purpose
    // -------
    // Summaries report extremes and levels; an infinite minimum yields no
    // levels.
    fn summary_reports_extremes() {
        let fm = FeatureMatrix::new(array![[100.0, 27.14], [50.0, 20.0]], array![90.0, 60.0])
            .expect("valid");
        let grid = scan(&fm, &ModelSpec::default(), &unit_grid(), 0.1).expect("scan");
        let fitted = CoatingParams::new(0.0, 0.0, 0.1);

        let summary = summarize(&grid, Some(&fitted));

        let expected_min = grid.scores.iter().cloned().fold(f64::INFINITY, f64::min);
        assert_eq!(summary.min_score, expected_min);
        assert!(summary.levels.iter().all(|&l| l >= summary.min_score && l < summary.max_score));
        assert_relative_eq!(summary.levels[0], summary.min_score);
        assert_eq!(summary.fit_inside, Some(true));
        let d = summary.fit_distance.expect("fitted point given");
        assert_relative_eq!(d, summary.argmin.0.hypot(summary.argmin.1), epsilon = 1e-12);

        let perfect = scan(&single(), &ModelSpec::default(), &unit_grid(), 0.0).expect("scan");
        let s = summarize(&perfect, None);
        assert_eq!(s.min_score, f64::NEG_INFINITY);
        assert_eq!(s.argmin, (1.0, 0.0));
        assert!(s.levels.is_empty());
        assert_eq!(s.fit_distance, None);
    }

    #[test]
    // Purpose
    // -------
    // Every cell equals a direct `score` call, whichever scan path (rayon or
    // sequential) was compiled in.
    fn cells_equal_direct_score_calls() {
        let fm = FeatureMatrix::new(array![[100.0, 27.14], [50.0, 20.0], [310.0, 88.0]], array![
            90.0, 60.0, 250.0
        ])
        .expect("valid");
        let spec = ModelSpec::default();
        let grid_spec = GridSpec {
            a: GridAxis { start: 0.0, stop: 1.5, step: 0.1 },
            b: GridAxis { start: 0.0, stop: 1.0, step: 0.25 },
            fixed_c: None,
        };

        let grid = scan(&fm, &spec, &grid_spec, -0.2).expect("scan");

        for (i, &a) in grid.a_values.iter().enumerate() {
            for (j, &b) in grid.b_values.iter().enumerate() {
                let direct = score(&fm, &CoatingParams::new(a, b, -0.2), &spec);
                assert_eq!(grid.scores[[i, j]], direct);
            }
        }
        assert_eq!(grid.spec.fixed_c, Some(-0.2));
    }

    #[test]
    // Purpose
    // -------
    // Contour levels step by 0.1 from the minimum.
    fn contour_levels_step_from_minimum() {
        let levels = contour_levels(-2.0, -1.75);
        assert_eq!(levels.len(), 3);
        assert_relative_eq!(levels[2], -1.8, epsilon = 1e-12);
    }

    #[cfg(feature = "parallel")]
    #[test]
    // Purpose
    // -------
    // The rayon scan fills every row in A order with exactly the values a
    // sequential evaluation produces.
    //
    // Given
    // -----
    // - Four recipes, a 40 × 30 grid at `C = 0.15`.
    //
    // Expect
    // ------
    // - Every cell bit-identical to a direct `score` call.
    // - No row left at the zero it was allocated with.
    fn parallel_scan_matches_sequential_evaluation() {
        // Arrange
        let fm = FeatureMatrix::new(
            array![[100.0, 27.14], [50.0, 20.0], [310.0, 88.0], [720.0, 160.0]],
            array![90.0, 60.0, 250.0, 610.0],
        )
        .expect("valid");
        let spec = ModelSpec::default();
        let grid_spec = GridSpec {
            a: GridAxis { start: -1.0, stop: 3.0, step: 0.1 },
            b: GridAxis { start: -0.5, stop: 2.5, step: 0.1 },
            fixed_c: None,
        };

        // Act
        let grid = scan(&fm, &spec, &grid_spec, 0.15).expect("scan");

        // Assert
        assert_eq!(grid.shape(), (40, 30));
        let sequential: Vec<Vec<f64>> = grid
            .a_values
            .iter()
            .map(|&a| {
                grid.b_values
                    .iter()
                    .map(|&b| score(&fm, &CoatingParams::new(a, b, 0.15), &spec))
                    .collect()
            })
            .collect();
        for (i, row) in sequential.iter().enumerate() {
            for (j, &expected) in row.iter().enumerate() {
                assert_eq!(grid.scores[[i, j]].to_bits(), expected.to_bits(), "cell ({i}, {j})");
            }
        }
        assert!(grid.scores.rows().into_iter().all(|r| r.iter().any(|&s| s != 0.0)));
    }
}
