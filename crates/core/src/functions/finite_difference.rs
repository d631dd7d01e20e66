use ndarray::{Array1, Array2, ArrayView1};
use thiserror::Error;

use crate::{Jacobian, StepFunction};

/// A closure-backed step function with a central-difference Jacobian.
///
/// Column `j` of the Jacobian is `(f(x + h e_j) - f(x - h e_j)) / 2h` with
/// `h = rel_step * max(|x_j|, 1)`. The default relative step is the cube root
/// of machine epsilon, which balances truncation and rounding error for
/// central differences.
///
/// This is a fallback for closures that only run on `f64`. A step written as a
/// [`GenericStep`](crate::functions::GenericStep) gets an exact Jacobian from
/// [`DualJacobian`](crate::functions::DualJacobian) instead.
#[derive(Debug, Clone)]
pub struct FiniteDifference<F> {
    function: F,
    state_dim: usize,
    driver_dim: usize,
    rel_step: f64,
}

/// Errors when configuring a [`FiniteDifference`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FiniteDifferenceError {
    /// The relative step is NaN, infinite, zero, or negative.
    #[error("relative step must be finite and positive, got {0}")]
    RelStep(f64),
}

impl<F> FiniteDifference<F>
where
    F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Array1<f64>,
{
    /// Wraps `function`, which maps a state of length `state_dim` and a driver
    /// of length `driver_dim` to the next state.
    pub fn new(state_dim: usize, driver_dim: usize, function: F) -> Self {
        Self {
            function,
            state_dim,
            driver_dim,
            rel_step: f64::EPSILON.cbrt(),
        }
    }

    /// Replaces the relative step size.
    ///
    /// # Errors
    ///
    /// Returns an error if `rel_step` is not finite and positive.
    pub fn with_rel_step(self, rel_step: f64) -> Result<Self, FiniteDifferenceError> {
        if !rel_step.is_finite() || rel_step <= 0.0 {
            return Err(FiniteDifferenceError::RelStep(rel_step));
        }
        Ok(Self { rel_step, ..self })
    }

    /// Returns the relative step size.
    #[must_use]
    pub fn rel_step(&self) -> f64 {
        self.rel_step
    }
}

impl<F> StepFunction<f64> for FiniteDifference<F>
where
    F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Array1<f64>,
{
    fn state_dim(&self) -> usize {
        self.state_dim
    }

    fn driver_dim(&self) -> usize {
        self.driver_dim
    }

    fn step(&self, state: ArrayView1<'_, f64>, driver: ArrayView1<'_, f64>) -> Array1<f64> {
        (self.function)(state, driver)
    }
}

impl<F> Jacobian<f64> for FiniteDifference<F>
where
    F: Fn(ArrayView1<'_, f64>, ArrayView1<'_, f64>) -> Array1<f64>,
{
    fn jacobian(&self, state: ArrayView1<'_, f64>, driver: ArrayView1<'_, f64>) -> Array2<f64> {
        let dim = state.len();
        let mut jac = Array2::zeros((dim, dim));
        let mut shifted = state.to_owned();

        for j in 0..dim {
            let x = state[j];
            let h = self.rel_step * x.abs().max(1.0);

            shifted[j] = x + h;
            let forward = (self.function)(shifted.view(), driver);
            shifted[j] = x - h;
            let backward = (self.function)(shifted.view(), driver);
            shifted[j] = x;

            jac.column_mut(j).assign(&((forward - backward) / (2.0 * h)));
        }

        jac
    }

    fn jacobian_diagonal(
        &self,
        state: ArrayView1<'_, f64>,
        driver: ArrayView1<'_, f64>,
    ) -> Array1<f64> {
        let dim = state.len();
        let mut diag = Array1::zeros(dim);
        let mut shifted = state.to_owned();

        for j in 0..dim {
            let x = state[j];
            let h = self.rel_step * x.abs().max(1.0);

            shifted[j] = x + h;
            let forward = (self.function)(shifted.view(), driver)[j];
            shifted[j] = x - h;
            let backward = (self.function)(shifted.view(), driver)[j];
            shifted[j] = x;

            diag[j] = (forward - backward) / (2.0 * h);
        }

        diag
    }
}
