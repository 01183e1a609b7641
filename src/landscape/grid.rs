//! Grid axes and the scan specification.
//!
//! An axis is the half-open range `[start, stop)` sampled every `step`:
//! `start, start + step, …` while the value stays below `stop`. The count is
//! computed once as `ceil((stop − start) / step)` with a small slack so that
//! `[-1, 2)` at step `0.01` has exactly 300 points despite rounding, and
//! each value is `start + i·step` (no accumulated drift).
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::landscape::errors::{LandscapeError, LandscapeResult};

/// Upper limit on `len(A) · len(B)`.
pub const MAX_GRID_CELLS: usize = 25_000_000;

/// Slack absorbing rounding in `(stop − start) / step`.
const COUNT_SLACK: f64 = 1e-9;

/// Half-open sampled range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl GridAxis {
    /// # Errors
    /// [`LandscapeError::InvalidAxis`] for non-finite values, `start >= stop`
    /// or a non-positive step.
    pub fn new(axis: &'static str, start: f64, stop: f64, step: f64) -> LandscapeResult<Self> {
        let this = Self { start, stop, step };
        this.validate(axis)?;
        Ok(this)
    }

    pub fn validate(&self, axis: &'static str) -> LandscapeResult<()> {
        let invalid = |reason| LandscapeError::InvalidAxis {
            axis,
            start: self.start,
            stop: self.stop,
            step: self.step,
            reason,
        };
        if !self.start.is_finite() || !self.stop.is_finite() || !self.step.is_finite() {
            return Err(invalid("values must be finite"));
        }
        if self.start >= self.stop {
            return Err(invalid("start must be below stop"));
        }
        if self.step <= 0.0 {
            return Err(invalid("step must be > 0"));
        }
        Ok(())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        ((self.stop - self.start) / self.step - COUNT_SLACK).ceil().max(0.0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn values(&self) -> Array1<f64> {
        Array1::from_iter((0..self.len()).map(|i| self.start + i as f64 * self.step))
    }

    /// `true` when `value` lies within `[start, stop)`.
    pub fn covers(&self, value: f64) -> bool {
        value >= self.start && value < self.stop
    }
}

/// What to scan: the A and B axes and an optional fixed C.
///
/// Default: `A ∈ [−1, 2)`, `B ∈ [−1, 4)`, step `0.01`, `C` taken from the
/// relative-error fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub a: GridAxis,
    pub b: GridAxis,
    pub fixed_c: Option<f64>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            a: GridAxis { start: -1.0, stop: 2.0, step: 0.01 },
            b: GridAxis { start: -1.0, stop: 4.0, step: 0.01 },
            fixed_c: None,
        }
    }
}

impl GridSpec {
    /// # Errors
    /// - Axis validation failures.
    /// - [`LandscapeError::NonFiniteFixedC`].
    /// - [`LandscapeError::GridTooLarge`] above [`MAX_GRID_CELLS`].
    pub fn validate(&self) -> LandscapeResult<()> {
        self.a.validate("A")?;
        self.b.validate("B")?;
        if let Some(c) = self.fixed_c {
            if !c.is_finite() {
                return Err(LandscapeError::NonFiniteFixedC { value: c });
            }
        }
        let cells = self.a.len().saturating_mul(self.b.len());
        if cells > MAX_GRID_CELLS {
            return Err(LandscapeError::GridTooLarge { cells, max: MAX_GRID_CELLS });
        }
        Ok(())
    }

    /// The configured fixed C, or `fallback`.
    pub fn resolve_c(&self, fallback: f64) -> f64 {
        self.fixed_c.unwrap_or(fallback)
    }

    /// Grid shape `(len(A), len(B))`.
    pub fn shape(&self) -> (usize, usize) {
        (self.a.len(), self.b.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sample counts for the default and unit-step axes.
    // - Drift-free axis values.
    // - Axis and spec validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Default axes have 300 and 500 samples; unit-step axes 3 and 5.
    fn axis_lengths_match_half_open_ranges() {
        let spec = GridSpec::default();
        assert_eq!(spec.shape(), (300, 500));

        let a = GridAxis::new("A", -1.0, 2.0, 1.0).expect("valid axis");
        let b = GridAxis::new("B", -1.0, 4.0, 1.0).expect("valid axis");
        assert_eq!(a.values().to_vec(), vec![-1.0, 0.0, 1.0]);
        assert_eq!(b.len(), 5);
        assert!(!b.covers(4.0));
    }

    #[test]
    // Purpose
    // -------
    // Values are computed as `start + i·step`, so the last default A sample
    // is 1.99 up to a single rounding.
    fn values_do_not_drift() {
        let values = GridSpec::default().a.values();
        assert_relative_eq!(values[299], 1.99, epsilon = 1e-12);
        assert_relative_eq!(values[100], 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Invalid axes, fixed C and oversized grids are rejected.
    fn validation_rejects_bad_specs() {
        assert!(GridAxis::new("A", 2.0, -1.0, 0.1).is_err());
        assert!(GridAxis::new("A", -1.0, 2.0, 0.0).is_err());
        assert!(GridAxis::new("A", -1.0, f64::INFINITY, 0.1).is_err());

        let spec = GridSpec { fixed_c: Some(f64::NAN), ..GridSpec::default() };
        assert!(matches!(spec.validate(), Err(LandscapeError::NonFiniteFixedC { .. })));

        let huge = GridSpec {
            a: GridAxis { start: 0.0, stop: 1.0, step: 1e-5 },
            b: GridAxis { start: 0.0, stop: 1.0, step: 1e-5 },
            fixed_c: None,
        };
        assert!(matches!(huge.validate(), Err(LandscapeError::GridTooLarge { .. })));
        assert_eq!(GridSpec::default().resolve_c(0.25), 0.25);
    }
}
