//! Adapter that exposes a user `LeastSquares` model as an `argmin` problem.
//!
//! The solver iterates on an unconstrained vector `z`. Every evaluation maps
//! `z` into the box with [`BoxBounds::to_model`], evaluates the residuals at
//! the resulting model-space `θ`, and returns the mean squared residual
//! `c(z) = (1/N) Σ r_i(θ(z))²`.
//!
//! With an analytic Jacobian `J = ∂r/∂θ` the gradient is
//! `∇_z c = (2/N) · (Jᵀ r) ∘ ∂θ/∂z`. Without one, we finite-difference the
//! **cost** closure directly in `z`-space.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    lsq_optimizer::{
        traits::LeastSquares,
        types::{Cost, Grad, Residuals, Theta},
        validation::{validate_grad, validate_jacobian, validate_residuals},
    },
    numerical_stability::BoxBounds,
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// Bridges a user `LeastSquares` model to `argmin`'s `CostFunction` and
/// `Gradient`, operating in the unconstrained space of `bounds`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LeastSquares> {
    pub f: &'a F,
    pub data: &'a F::Data,
    pub bounds: &'a BoxBounds,
    pub n_obs: usize,
}

impl<'a, F: LeastSquares> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a user model, its data, and the box.
    ///
    /// `n_obs` is the residual length every evaluation must produce.
    pub fn new(f: &'a F, data: &'a F::Data, bounds: &'a BoxBounds, n_obs: usize) -> Self {
        Self { f, data, bounds, n_obs }
    }

    /// Residuals at the model-space image of `z`, validated.
    fn residuals_at(&self, z: &Theta) -> Result<(Theta, Residuals), Error> {
        let theta = self.bounds.to_model(z);
        let residuals = self.f.residuals(&theta, self.data)?;
        validate_residuals(&residuals, self.n_obs)?;
        Ok((theta, residuals))
    }
}

impl<'a, F: LeastSquares> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate the mean squared residual at `z`.
    ///
    /// # Errors
    /// - Propagates any `OptError` from the user's `residuals`.
    /// - `NonFiniteCost` if the mean square overflows.
    fn cost(&self, z: &Self::Param) -> Result<Self::Output, Error> {
        let (_, residuals) = self.residuals_at(z)?;
        let output = residuals.dot(&residuals) / self.n_obs as f64;
        if !output.is_finite() {
            return Err((OptError::NonFiniteCost { value: output }).into());
        }
        Ok(output)
    }
}

impl<'a, F: LeastSquares> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate the gradient of the cost at `z`.
    ///
    /// Behavior:
    /// - If the user implements `jacobian(θ, data)`, we validate it and apply
    ///   the chain rule through the box transform.
    /// - Otherwise, we compute a finite-difference gradient of the **cost**:
    ///   - Try *central* differences first.
    ///   - If any evaluation of the `cost` closure failed (captured via
    ///     `closure_err`), retry with *forward* differences.
    ///   - Validate the FD gradient; if it fails, retry once with *forward*
    ///     differences and validate again.
    ///
    /// # Errors
    /// - Propagates user errors from `jacobian` (non-`JacobianNotImplemented`).
    /// - Propagates any error raised by cost evaluations performed during FD.
    /// - Returns validation errors for wrong shapes or non-finite entries.
    fn gradient(&self, z: &Self::Param) -> Result<Self::Gradient, Error> {
        let dim = z.len();
        let theta = self.bounds.to_model(z);
        match self.f.jacobian(&theta, self.data) {
            Ok(jacobian) => {
                validate_jacobian(&jacobian, self.n_obs, dim)?;
                let residuals = self.f.residuals(&theta, self.data)?;
                validate_residuals(&residuals, self.n_obs)?;
                let grad_theta = jacobian.t().dot(&residuals) * (2.0 / self.n_obs as f64);
                let grad = grad_theta * self.bounds.chain_factor(z);
                validate_grad(&grad, dim)?;
                Ok(grad)
            }
            Err(OptError::JacobianNotImplemented) => {
                let closure_err: RefCell<Option<Error>> = RefCell::new(None);
                let cost_func = |z: &Theta| -> f64 {
                    match self.cost(z) {
                        Ok(val) => val,
                        Err(e) => {
                            let mut slot = closure_err.borrow_mut();
                            if slot.is_none() {
                                *slot = Some(e);
                            }
                            f64::NAN
                        }
                    }
                };
                let fd_grad = z.central_diff(&cost_func);
                if closure_err.borrow().is_some() {
                    return run_fd_diff(z, &cost_func, &closure_err);
                }
                match validate_grad(&fd_grad, dim) {
                    Ok(()) => Ok(fd_grad),
                    Err(_) => run_fd_diff(z, &cost_func, &closure_err),
                }
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Compute a forward-difference gradient of `func` at `z`, with error capture.
///
/// The FD closure can’t return `Result`, so any error raised by `func` is
/// stored into `closure_err` and the closure returns `NaN`. This helper
/// clears the slot, runs `forward_diff`, surfaces a captured error, and
/// validates the result.
fn run_fd_diff<G: Fn(&Theta) -> f64>(
    z: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> Result<Grad, Error> {
    closure_err.replace(None);
    let fd_grad = z.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_grad(&fd_grad, z.len())?;
    Ok(fd_grad)
}
