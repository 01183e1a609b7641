//! Numerical stability utilities.
//!
//! Provides safe implementations of the logistic transform and its inverse,
//! which the optimizer uses to map an unconstrained vector onto a closed box.
//! Both follow guarded strategies similar to those in major ML libraries
//! (e.g. PyTorch, TensorFlow), branching on the sign of the input so that
//! `exp` is only ever evaluated on non-positive arguments.
//!
//! # Provided items
//! - [`LOGIT_EPS`]: clamp used before taking a logit, so that points sitting
//!   exactly on a bound map to a large but finite unconstrained value.
//! - [`EIGEN_EPS`]: eigenvalue cutoff for pseudoinverses.
//! - [`safe_logistic(x)`]: stable `1 / (1 + exp(-x))`, mapping ℝ → [0, 1].
//! - [`safe_logistic_deriv(x)`]: `σ(x)·(1 − σ(x))` without cancellation.
//! - [`safe_logit(p)`]: inverse of the logistic on (0, 1).

/// Clamp applied to unit-interval inputs of [`safe_logit`].
///
/// `logit(1e-12) ≈ -27.6`, far enough into the tail that the logistic maps
/// back onto the bound to within `1e-12`, yet small enough that the optimizer
/// can still move away from it.
pub const LOGIT_EPS: f64 = 1e-12;

/// Eigenvalues at or below this magnitude are treated as zero when forming
/// pseudoinverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Numerically stable logistic: `σ(x) = 1 / (1 + exp(-x))`.
///
/// - For `x ≥ 0` evaluates `1 / (1 + exp(-x))`.
/// - For `x < 0` evaluates `exp(x) / (1 + exp(x))`.
///
/// Neither branch can overflow; the result is always in `[0, 1]` for finite
/// `x`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Derivative of the logistic, `σ'(x) = σ(x)·(1 − σ(x))`.
///
/// Computed as `e / (1 + e)²` with `e = exp(-|x|)`, which is symmetric in `x`
/// and avoids forming `1 − σ(x)` when `σ(x)` is close to one.
pub fn safe_logistic_deriv(x: f64) -> f64 {
    let e = (-x.abs()).exp();
    e / ((1.0 + e) * (1.0 + e))
}

/// Stable logit: solves `σ(t) = p` for `t`, i.e. `t = ln(p / (1 − p))`.
///
/// `p` is clamped into `[LOGIT_EPS, 1 − LOGIT_EPS]` first, so inputs on (or
/// marginally past) the unit interval's edges still produce finite output.
pub fn safe_logit(p: f64) -> f64 {
    let p = p.clamp(LOGIT_EPS, 1.0 - LOGIT_EPS);
    p.ln() - (-p).ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the stable logistic with the naïve formula on a safe grid.
    // - Tail behavior (no overflow, range stays in [0, 1]).
    // - `safe_logit` as the inverse of `safe_logistic`.
    // - The closed-form derivative against a central difference.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The guarded logistic matches `1 / (1 + exp(-x))` where the naïve
    // formula is well conditioned.
    fn safe_logistic_matches_naive_formula_on_safe_grid() {
        for i in -40..=40 {
            let x = i as f64 * 0.25;
            let naive = 1.0 / (1.0 + (-x).exp());
            assert_relative_eq!(safe_logistic(x), naive, max_relative = 1e-14);
        }
    }

    #[test]
    // Purpose
    // -------
    // Extreme inputs must saturate to the unit interval's edges, never NaN.
    fn safe_logistic_saturates_without_overflow() {
        assert_eq!(safe_logistic(1e6), 1.0);
        assert_eq!(safe_logistic(-1e6), 0.0);
        assert!(safe_logistic(-800.0) >= 0.0);
        assert!(safe_logistic_deriv(800.0).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // `safe_logit` inverts `safe_logistic` in the interior.
    fn safe_logit_inverts_logistic() {
        for &p in &[1e-6, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0 - 1e-6] {
            assert_relative_eq!(safe_logistic(safe_logit(p)), p, max_relative = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Values on the edges are clamped instead of producing ±∞.
    fn safe_logit_clamps_edges() {
        assert!(safe_logit(0.0).is_finite());
        assert!(safe_logit(1.0).is_finite());
        assert!(safe_logit(0.0) < -20.0);
        assert!(safe_logit(1.0) > 20.0);
    }

    #[test]
    // Purpose
    // -------
    // The closed-form derivative agrees with a central difference.
    fn safe_logistic_deriv_matches_central_difference() {
        let h = 1e-6;
        for &x in &[-5.0, -1.0, 0.0, 0.3, 2.0, 7.5] {
            let fd = (safe_logistic(x + h) - safe_logistic(x - h)) / (2.0 * h);
            assert_relative_eq!(safe_logistic_deriv(x), fd, max_relative = 1e-6);
        }
    }
}
