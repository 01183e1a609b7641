//! Box bounds and the logistic map between optimizer space and the box.
//!
//! Purpose
//! -------
//! Keep bounded parameters inside a closed box `[lo, hi]` **by construction**.
//! The solver iterates on an unconstrained vector `z ∈ ℝⁿ`; every candidate it
//! proposes is mapped into model space by
//!
//! `θ_k = lo_k + (hi_k − lo_k) · σ(z_k)`
//!
//! so no candidate can ever leave the box, and no penalty term is needed.
//!
//! Key behaviors
//! -------------
//! - [`BoxBounds::new`] validates that bounds are finite with `lo < hi`.
//! - [`BoxBounds::to_model`] / [`BoxBounds::to_unconstrained`] map between the
//!   two spaces; [`BoxBounds::chain_factor`] returns the diagonal Jacobian
//!   `∂θ/∂z` used to pull gradients back into optimizer space.
//! - [`BoxBounds::check_feasible`] rejects starting points outside the box.
//!
//! Invariants & assumptions
//! ------------------------
//! - `lower.len() == upper.len()` and every pair is finite with `lo < hi`.
//! - For any finite `z`, `to_model(z)` lies in `[lo, hi]` component-wise.
//!
//! Conventions
//! -----------
//! - The box midpoint maps to `z = 0`; it is the default feasible start.
//! - Points exactly on a bound map to a large finite `z` via [`safe_logit`]'s
//!   clamp rather than to ±∞. The logistic is flat there, so solver starts
//!   go through [`BoxBounds::strictly_interior`] first.
use crate::optimization::{
    errors::{OptError, OptResult},
    lsq_optimizer::types::Theta,
    numerical_stability::transformations::{safe_logistic, safe_logistic_deriv, safe_logit},
};
use ndarray::Zip;

/// Fraction of each box width a solver start is kept away from the bounds.
pub const INTERIOR_MARGIN: f64 = 1e-3;

/// BoxBounds — validated per-parameter lower/upper limits.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxBounds {
    lower: Theta,
    upper: Theta,
}

impl BoxBounds {
    /// Construct validated box bounds.
    ///
    /// # Errors
    /// - [`OptError::BoundsLengthMismatch`] if the vectors differ in length.
    /// - [`OptError::InvalidBounds`] for the first pair that is non-finite or
    ///   has `lower >= upper`.
    pub fn new(lower: Theta, upper: Theta) -> OptResult<Self> {
        if lower.len() != upper.len() {
            return Err(OptError::BoundsLengthMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        for (index, (&lo, &hi)) in lower.iter().zip(upper.iter()).enumerate() {
            if !lo.is_finite() || !hi.is_finite() || lo >= hi {
                return Err(OptError::InvalidBounds { index, lower: lo, upper: hi });
            }
        }
        Ok(Self { lower, upper })
    }

    /// Number of bounded parameters.
    pub fn dim(&self) -> usize {
        self.lower.len()
    }

    pub fn lower(&self) -> &Theta {
        &self.lower
    }

    pub fn upper(&self) -> &Theta {
        &self.upper
    }

    /// Component-wise midpoint of the box (maps to `z = 0`).
    pub fn midpoint(&self) -> Theta {
        (&self.lower + &self.upper) * 0.5
    }

    /// `true` when every component of `theta` lies in `[lo, hi]`.
    pub fn contains(&self, theta: &Theta) -> bool {
        theta.len() == self.dim()
            && theta
                .iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(&t, (&lo, &hi))| t >= lo && t <= hi)
    }

    /// Reject a starting point that is the wrong length, non-finite, or
    /// outside the box.
    ///
    /// # Errors
    /// - [`OptError::ThetaLengthMismatch`] on a length mismatch.
    /// - [`OptError::InfeasibleStart`] for the first offending component.
    pub fn check_feasible(&self, theta: &Theta) -> OptResult<()> {
        if theta.len() != self.dim() {
            return Err(OptError::ThetaLengthMismatch {
                expected: self.dim(),
                actual: theta.len(),
            });
        }
        for (index, ((&value, &lower), &upper)) in
            theta.iter().zip(self.lower.iter()).zip(self.upper.iter()).enumerate()
        {
            if !value.is_finite() || value < lower || value > upper {
                return Err(OptError::InfeasibleStart { index, value, lower, upper });
            }
        }
        Ok(())
    }

    /// Move components within `INTERIOR_MARGIN · (hi − lo)` of a bound to
    /// that distance from it; other components are returned unchanged.
    ///
    /// At a bound `∂θ/∂z` is ~1e-12, so a start left there never moves.
    pub fn strictly_interior(&self, theta: &Theta) -> Theta {
        Zip::from(theta).and(&self.lower).and(&self.upper).map_collect(|&t, &lo, &hi| {
            let margin = INTERIOR_MARGIN * (hi - lo);
            t.clamp(lo + margin, hi - margin)
        })
    }

    /// Map an unconstrained vector into the box.
    pub fn to_model(&self, z: &Theta) -> Theta {
        Zip::from(z)
            .and(&self.lower)
            .and(&self.upper)
            .map_collect(|&zk, &lo, &hi| (lo + (hi - lo) * safe_logistic(zk)).clamp(lo, hi))
    }

    /// Map a point of the box into unconstrained space.
    ///
    /// Assumes `theta` has already passed [`BoxBounds::check_feasible`].
    pub fn to_unconstrained(&self, theta: &Theta) -> Theta {
        Zip::from(theta)
            .and(&self.lower)
            .and(&self.upper)
            .map_collect(|&t, &lo, &hi| safe_logit((t - lo) / (hi - lo)))
    }

    /// Diagonal of the Jacobian `∂θ/∂z` at `z`.
    pub fn chain_factor(&self, z: &Theta) -> Theta {
        Zip::from(z)
            .and(&self.lower)
            .and(&self.upper)
            .map_collect(|&zk, &lo, &hi| (hi - lo) * safe_logistic_deriv(zk))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation in `BoxBounds::new` and `check_feasible`.
    // - The logistic map: range, round trip, and midpoint convention.
    // - `chain_factor` against a finite difference of `to_model`.
    // - Pulling on-bound starts into the interior.
    // -------------------------------------------------------------------------

    fn coating_box() -> BoxBounds {
        BoxBounds::new(array![0.0, 0.0, -3.0], array![3.0, 1.0, 3.0])
            .expect("coating bounds should be valid")
    }

    #[test]
    // Purpose
    // -------
    // Bounds with `lower >= upper` or non-finite entries are rejected with the
    // offending index.
    fn new_rejects_degenerate_pairs() {
        let err = BoxBounds::new(array![0.0, 1.0], array![1.0, 1.0]).unwrap_err();
        assert_eq!(err, OptError::InvalidBounds { index: 1, lower: 1.0, upper: 1.0 });

        let err = BoxBounds::new(array![f64::NEG_INFINITY], array![1.0]).unwrap_err();
        assert!(matches!(err, OptError::InvalidBounds { index: 0, .. }));

        let err = BoxBounds::new(array![0.0], array![1.0, 2.0]).unwrap_err();
        assert_eq!(err, OptError::BoundsLengthMismatch { lower: 1, upper: 2 });
    }

    #[test]
    // Purpose
    // -------
    // Any finite unconstrained vector lands inside the box, including far
    // into the logistic tails.
    fn to_model_always_lands_in_box() {
        let bounds = coating_box();
        for &z in &[-1e6, -50.0, -3.0, 0.0, 2.5, 40.0, 1e6] {
            let theta = bounds.to_model(&array![z, -z, z * 0.5]);
            assert!(bounds.contains(&theta), "z = {z} mapped outside the box: {theta}");
        }
    }

    #[test]
    // Purpose
    // -------
    // Interior points survive a model → unconstrained → model round trip,
    // and the midpoint maps to zero.
    fn round_trip_and_midpoint() {
        let bounds = coating_box();
        let theta = array![0.9, 0.1, -0.4];
        let back = bounds.to_model(&bounds.to_unconstrained(&theta));
        for k in 0..3 {
            assert_relative_eq!(back[k], theta[k], epsilon = 1e-12);
        }
        let z_mid = bounds.to_unconstrained(&bounds.midpoint());
        assert!(z_mid.iter().all(|z| z.abs() < 1e-12));
    }

    #[test]
    // Purpose
    // -------
    // Starting points outside the box are rejected before any solve.
    fn check_feasible_rejects_outside_points() {
        let bounds = coating_box();
        assert!(bounds.check_feasible(&array![3.0, 0.0, -3.0]).is_ok());
        let err = bounds.check_feasible(&array![1.0, 1.5, 0.0]).unwrap_err();
        assert_eq!(err, OptError::InfeasibleStart { index: 1, value: 1.5, lower: 0.0, upper: 1.0 });
        let err = bounds.check_feasible(&array![1.0, 0.5]).unwrap_err();
        assert_eq!(err, OptError::ThetaLengthMismatch { expected: 3, actual: 2 });
    }

    #[test]
    // Purpose
    // -------
    // `chain_factor` is the derivative of `to_model`.
    fn chain_factor_matches_finite_difference() {
        let bounds = coating_box();
        let z = array![0.3, -1.2, 2.0];
        let h = 1e-6;
        let factor = bounds.chain_factor(&z);
        for k in 0..3 {
            let mut zp = z.clone();
            let mut zm = z.clone();
            zp[k] += h;
            zm[k] -= h;
            let fd = (bounds.to_model(&zp)[k] - bounds.to_model(&zm)[k]) / (2.0 * h);
            assert_relative_eq!(factor[k], fd, max_relative = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // Starts on or next to a bound are moved a fixed fraction of the width
    // inside, where the logistic still has a usable slope.
    //
    // Given
    // -----
    // - The corner `(0, 0, 0)` and an upper-bound start `(3, 1, 3)`.
    //
    // Expect
    // ------
    // - Bound components land at `lo + 1e-3·w` or `hi − 1e-3·w`; interior
    //   components are untouched.
    // - `chain_factor` at the mapped start is far from zero.
    fn strictly_interior_moves_bound_starts_inside() {
        // Arrange
        let bounds = coating_box();

        // Act
        let low = bounds.strictly_interior(&array![0.0, 0.0, 0.0]);
        let high = bounds.strictly_interior(&array![3.0, 1.0, 3.0]);

        // Assert
        assert_relative_eq!(low[0], 3e-3, epsilon = 1e-15);
        assert_relative_eq!(low[1], 1e-3, epsilon = 1e-15);
        assert_eq!(low[2], 0.0);
        assert_relative_eq!(high[0], 3.0 - 3e-3, epsilon = 1e-12);
        assert_relative_eq!(high[2], 3.0 - 6e-3, epsilon = 1e-12);
        let factor = bounds.chain_factor(&bounds.to_unconstrained(&low));
        assert!(factor.iter().all(|&f| f > 1e-4), "flat start: {factor}");
    }
}
