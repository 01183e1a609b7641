//! report — one-shot analysis pipeline and its serializable output.
//!
//! Purpose
//! -------
//! Run catalog lookup → features → both fits → landscape scan for a recipe
//! dataset and package everything a presentation layer needs to draw the
//! contour plot and the two predicted-vs-actual scatters.
//!
//! Key behaviors
//! -------------
//! - [`run_analysis`] either returns a complete [`DiagnosticReport`] or the
//!   first error; there is no partial report.
//! - The landscape is scanned at `GridSpec::fixed_c` or, when unset, at the
//!   relative-error fit's `C`, and summarized against that fit's `(A, B)`.
//! - The report also carries the baseline score and ratios at a reference
//!   guess, default `(0.9, 0.1, 0)`.
//!
//! Conventions
//! -----------
//! - Arrays are flattened to `Vec`s; `scores[i][j]` is the score at
//!   `(a_values[i], b_values[j])`.
//! - Non-finite scores (a perfect fit gives `−inf`) serialize as JSON `null`.
use log::info;
use serde::Serialize;

use crate::{
    catalog::MouldCatalog,
    coating::{
        CoatingParams, CoatingResult, FeatureMatrix, FitOptions, FitResult, ModelSpec, Objective,
        RecipeSet, fit_both, ratios, score_from_ratios,
    },
    landscape::{GridAxis, GridSpec, LandscapeGrid, LandscapeSummary, scan, summarize},
};

/// Everything [`run_analysis`] needs besides the data.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub fit: FitOptions,
    pub grid: GridSpec,
    /// Baseline parameters scored for comparison.
    pub reference: CoatingParams,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            fit: FitOptions::default(),
            grid: GridSpec::default(),
            reference: CoatingParams::REFERENCE,
        }
    }
}

/// One fitted parameter vector as reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub objective: Objective,
    pub params: CoatingParams,
    pub score: f64,
    pub cost: f64,
    pub iterations: usize,
    pub status: String,
    pub std_errors: Option<Vec<f64>>,
    pub covariance: Option<Vec<Vec<f64>>>,
}

impl From<&FitResult> for FitSummary {
    fn from(fit: &FitResult) -> Self {
        Self {
            objective: fit.objective,
            params: fit.params,
            score: fit.score,
            cost: fit.cost,
            iterations: fit.iterations,
            status: fit.status.clone(),
            std_errors: fit.covariance.as_ref().map(|c| c.std_errors.to_vec()),
            covariance: fit
                .covariance
                .as_ref()
                .map(|c| c.matrix.rows().into_iter().map(|r| r.to_vec()).collect()),
        }
    }
}

/// Baseline at the reference guess.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceSummary {
    pub params: CoatingParams,
    pub score: f64,
    pub ratios: Vec<f64>,
}

/// Prediction of one fit for one recipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointFit {
    pub predicted: f64,
    pub ratio: f64,
    /// `ratio − 1`.
    pub fractional_residual: f64,
}

impl PointFit {
    fn at(fit: &FitResult, i: usize) -> Self {
        let ratio = fit.ratios[i];
        Self { predicted: fit.predictions[i], ratio, fractional_residual: ratio - 1.0 }
    }
}

/// Labelled predicted-vs-actual row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecipePoint {
    pub index: usize,
    /// Recipe note, `"?"` when absent.
    pub label: String,
    pub shell: Option<String>,
    pub moulds: Vec<String>,
    pub x0: f64,
    pub x1: f64,
    pub target: f64,
    pub absolute: PointFit,
    pub relative: PointFit,
    pub reference_ratio: f64,
}

/// Landscape grid with its axes and summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandscapeReport {
    pub a_axis: GridAxis,
    pub b_axis: GridAxis,
    pub c: f64,
    pub a_values: Vec<f64>,
    pub b_values: Vec<f64>,
    pub scores: Vec<Vec<f64>>,
    pub min_score: f64,
    pub max_score: f64,
    pub argmin: [f64; 2],
    pub levels: Vec<f64>,
    pub fit_distance: Option<f64>,
    pub fit_inside: Option<bool>,
}

impl LandscapeReport {
    fn new(grid: &LandscapeGrid, summary: LandscapeSummary) -> Self {
        Self {
            a_axis: grid.spec.a,
            b_axis: grid.spec.b,
            c: grid.c,
            a_values: grid.a_values.to_vec(),
            b_values: grid.b_values.to_vec(),
            scores: grid.scores.rows().into_iter().map(|r| r.to_vec()).collect(),
            min_score: summary.min_score,
            max_score: summary.max_score,
            argmin: [summary.argmin.0, summary.argmin.1],
            levels: summary.levels,
            fit_distance: summary.fit_distance,
            fit_inside: summary.fit_inside,
        }
    }
}

/// Complete, read-only output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub model: ModelSpec,
    pub absolute: FitSummary,
    pub relative: FitSummary,
    pub reference: ReferenceSummary,
    pub recipes: Vec<RecipePoint>,
    pub landscape: LandscapeReport,
}

impl std::fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "recipes:        {}", self.recipes.len())?;
        for fit in [&self.absolute, &self.relative] {
            writeln!(f, "{:<15} {} score {:.4}", format!("{}:", fit.objective), fit.params, fit.score)?;
        }
        writeln!(f, "{:<15} {} score {:.4}", "reference:", self.reference.params, self.reference.score)?;
        write!(
            f,
            "landscape:      {}x{} at C = {:.4}, min {:.4} at A = {:.2}, B = {:.2}",
            self.landscape.a_values.len(),
            self.landscape.b_values.len(),
            self.landscape.c,
            self.landscape.min_score,
            self.landscape.argmin[0],
            self.landscape.argmin[1]
        )
    }
}

/// Run the full pipeline.
///
/// # Errors
/// - Lookup and degenerate-input errors from feature extraction.
/// - Convergence or optimizer errors naming the failing objective.
/// - Landscape configuration errors.
pub fn run_analysis(
    catalog: &MouldCatalog, recipes: &RecipeSet, opts: &AnalysisOptions,
) -> CoatingResult<DiagnosticReport> {
    opts.grid.validate()?;
    let spec = opts.fit.spec;
    let data = FeatureMatrix::from_recipes(recipes, catalog)?;
    info!("fitting {} recipes", data.n_obs());

    let pair = fit_both(&data, &opts.fit)?;

    let reference_ratios = ratios(data.x().view(), data.targets(), &opts.reference, &spec);
    let reference = ReferenceSummary {
        params: opts.reference,
        score: score_from_ratios(&reference_ratios),
        ratios: reference_ratios.to_vec(),
    };
    info!("reference {}: score = {:.4}", reference.params, reference.score);

    let c = opts.grid.resolve_c(pair.relative.params.c);
    let grid = scan(&data, &spec, &opts.grid, c)?;
    let summary = summarize(&grid, Some(&pair.relative.params));

    let points = recipes
        .iter()
        .enumerate()
        .map(|(i, recipe)| {
            let features = data.row(i);
            RecipePoint {
                index: i,
                label: recipe.label().to_string(),
                shell: recipe.shell.clone(),
                moulds: recipe.moulds.clone(),
                x0: features.x0,
                x1: features.x1,
                target: data.targets()[i],
                absolute: PointFit::at(&pair.absolute, i),
                relative: PointFit::at(&pair.relative, i),
                reference_ratio: reference_ratios[i],
            }
        })
        .collect();

    Ok(DiagnosticReport {
        model: spec,
        absolute: FitSummary::from(&pair.absolute),
        relative: FitSummary::from(&pair.relative),
        reference,
        recipes: points,
        landscape: LandscapeReport::new(&grid, summary),
    })
}
