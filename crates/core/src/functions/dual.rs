use ndarray::{Array1, Array2, ArrayView1};
use num_dual::Dual;

use crate::{Jacobian, Scalar, StepFunction};

/// A step function written once for every [`Scalar`] type.
///
/// Implementing this instead of [`StepFunction`] lets [`DualJacobian`] derive
/// the exact Jacobian by evaluating the step on dual numbers.
pub trait GenericStep {
    /// Length of the state vector (`D`).
    fn state_dim(&self) -> usize;

    /// Length of the driver vector (`N`).
    fn driver_dim(&self) -> usize;

    /// Returns the next state.
    fn step<S: Scalar>(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S>;
}

/// A [`GenericStep`] with a forward-mode automatic-differentiation Jacobian.
///
/// Column `j` of the Jacobian is the derivative part of one evaluation on
/// dual numbers seeded with `∂x_j = 1`, so a `D`-dimensional state costs `D`
/// evaluations and the result is exact to rounding. The diagonal costs the
/// same `D` evaluations but allocates no matrix.
///
/// Works for any outer [`Scalar`]: when the solve itself runs on dual numbers,
/// the Jacobian is computed on nested duals and stays differentiable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DualJacobian<F> {
    function: F,
}

impl<F: GenericStep> DualJacobian<F> {
    /// Wraps `function`.
    pub fn new(function: F) -> Self {
        Self { function }
    }

    /// Returns the wrapped step function.
    pub fn inner(&self) -> &F {
        &self.function
    }

    /// Evaluates the step with state component `j` seeded for differentiation.
    fn seeded<S: Scalar>(
        &self,
        state: ArrayView1<'_, S>,
        driver: ArrayView1<'_, S>,
        j: usize,
    ) -> Array1<Dual<S, f64>> {
        let state = Array1::from_iter(state.iter().enumerate().map(|(i, &x)| {
            let tangent = if i == j { S::one() } else { S::zero() };
            Dual::new(x, tangent)
        }));
        let driver = driver.mapv(Dual::from_re);
        self.function.step(state.view(), driver.view())
    }
}

impl<S: Scalar, F: GenericStep> StepFunction<S> for DualJacobian<F> {
    fn state_dim(&self) -> usize {
        self.function.state_dim()
    }

    fn driver_dim(&self) -> usize {
        self.function.driver_dim()
    }

    fn step(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S> {
        self.function.step(state, driver)
    }
}

impl<S: Scalar, F: GenericStep> Jacobian<S> for DualJacobian<F> {
    fn jacobian(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array2<S> {
        let dim = state.len();
        let mut jac = Array2::zeros((dim, dim));

        for j in 0..dim {
            let column = self.seeded(state, driver, j);
            for (entry, value) in jac.column_mut(j).iter_mut().zip(&column) {
                *entry = value.eps;
            }
        }

        jac
    }

    fn jacobian_diagonal(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S> {
        let dim = state.len();
        let mut diag = Array1::zeros(dim);

        for (j, entry) in diag.iter_mut().enumerate() {
            if let Some(value) = self.seeded(state, driver, j).get(j) {
                *entry = value.eps;
            }
        }

        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;
    use num_dual::Dual64;

    /// `f(x, e) = [x0·x1 + e0, exp(3·x0), sin(x2)]`.
    struct Coupled;

    impl GenericStep for Coupled {
        fn state_dim(&self) -> usize {
            3
        }

        fn driver_dim(&self) -> usize {
            1
        }

        fn step<S: Scalar>(&self, x: ArrayView1<'_, S>, e: ArrayView1<'_, S>) -> Array1<S> {
            array![x[0] * x[1] + e[0], (x[0] * S::constant(3.0)).exp(), x[2].sin()]
        }
    }

    #[test]
    fn jacobian_is_exact() {
        let f = DualJacobian::new(Coupled);
        let x = array![5.0, -2.0, 0.3];
        let e = array![1.0];

        let jac: Array2<f64> = f.jacobian(x.view(), e.view());
        let expected = array![
            [-2.0, 5.0, 0.0],
            [3.0 * 15.0_f64.exp(), 0.0, 0.0],
            [0.0, 0.0, 0.3_f64.cos()],
        ];

        for (got, want) in jac.iter().zip(&expected) {
            assert_relative_eq!(got, want, max_relative = 1e-15);
        }
    }

    #[test]
    fn diagonal_matches_full_jacobian() {
        let f = DualJacobian::new(Coupled);
        let x = array![0.5, 1.5, -2.0];
        let e = array![0.2];

        let full: Array2<f64> = f.jacobian(x.view(), e.view());
        let diag: Array1<f64> = f.jacobian_diagonal(x.view(), e.view());

        assert_eq!(diag, full.diag());
    }

    #[test]
    fn step_matches_plain_evaluation() {
        let f = DualJacobian::new(Coupled);
        let value: Array1<f64> = f.step(array![1.0, 2.0, 0.0].view(), array![0.5].view());

        assert_relative_eq!(value[0], 2.5);
        assert_relative_eq!(value[1], 3.0_f64.exp());
        assert_relative_eq!(value[2], 0.0);
    }

    #[test]
    fn jacobian_of_dual_inputs_carries_second_derivatives() {
        let f = DualJacobian::new(Coupled);
        let x = array![Dual64::new(0.5, 1.0), Dual64::from(1.5), Dual64::from(-2.0)];
        let e = array![Dual64::from(0.2)];

        let jac: Array2<Dual64> = f.jacobian(x.view(), e.view());

        // ∂/∂x0 of ∂f1/∂x0 = 3·exp(3·x0) is 9·exp(3·x0).
        assert_relative_eq!(jac[[1, 0]].re, 3.0 * 1.5_f64.exp(), max_relative = 1e-15);
        assert_relative_eq!(jac[[1, 0]].eps, 9.0 * 1.5_f64.exp(), max_relative = 1e-15);
        // ∂/∂x0 of ∂f0/∂x1 = x0 is 1.
        assert_relative_eq!(jac[[0, 1]].eps, 1.0);
    }
}
