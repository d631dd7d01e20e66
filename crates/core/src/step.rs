use ndarray::{Array1, Array2, ArrayView1};

use crate::Scalar;

/// One step of a recurrence `h_t = f(h_{t-1}, e_t)`.
///
/// A step function maps a state of length [`state_dim`](Self::state_dim) and a
/// driver of length [`driver_dim`](Self::driver_dim) to the next state.
/// Implementations must be pure: solvers evaluate them at many points, in any
/// order, and from several threads at once.
///
/// The declared dimensions let solvers reject mismatched inputs before any
/// work is done.
pub trait StepFunction<S: Scalar> {
    /// Length of the state vector (`D`).
    fn state_dim(&self) -> usize;

    /// Length of the driver vector (`N`).
    fn driver_dim(&self) -> usize;

    /// Returns the next state.
    #[must_use]
    fn step(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S>;
}

/// A step function that can report its derivative with respect to the state.
///
/// The Jacobian may come from an analytic expression, automatic
/// differentiation, or finite differences (see
/// [`FiniteDifference`](crate::functions::FiniteDifference)).
pub trait Jacobian<S: Scalar>: StepFunction<S> {
    /// Returns the `D × D` matrix `J[i, j] = ∂f_i / ∂state_j`.
    #[must_use]
    fn jacobian(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array2<S>;

    /// Returns the diagonal of [`jacobian`](Self::jacobian).
    ///
    /// The default builds the full matrix and extracts its diagonal.
    /// Override it when the diagonal is cheaper to compute directly.
    #[must_use]
    fn jacobian_diagonal(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S> {
        self.jacobian(state, driver).diag().to_owned()
    }
}

impl<S: Scalar, T: StepFunction<S> + ?Sized> StepFunction<S> for &T {
    fn state_dim(&self) -> usize {
        (**self).state_dim()
    }

    fn driver_dim(&self) -> usize {
        (**self).driver_dim()
    }

    fn step(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S> {
        (**self).step(state, driver)
    }
}

impl<S: Scalar, T: Jacobian<S> + ?Sized> Jacobian<S> for &T {
    fn jacobian(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array2<S> {
        (**self).jacobian(state, driver)
    }

    fn jacobian_diagonal(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S> {
        (**self).jacobian_diagonal(state, driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::array;

    /// `f(x, e) = [x0 * x1 + e0, x1 - e0]`, a coupled state with a dense Jacobian.
    struct Coupled;

    impl StepFunction<f64> for Coupled {
        fn state_dim(&self) -> usize {
            2
        }

        fn driver_dim(&self) -> usize {
            1
        }

        fn step(&self, x: ArrayView1<'_, f64>, e: ArrayView1<'_, f64>) -> Array1<f64> {
            array![x[0] * x[1] + e[0], x[1] - e[0]]
        }
    }

    impl Jacobian<f64> for Coupled {
        fn jacobian(&self, x: ArrayView1<'_, f64>, _e: ArrayView1<'_, f64>) -> Array2<f64> {
            array![[x[1], x[0]], [0.0, 1.0]]
        }
    }

    #[test]
    fn step_uses_state_and_driver() {
        let next = Coupled.step(array![2.0, 3.0].view(), array![0.5].view());
        assert_eq!(next, array![6.5, 2.5]);
    }

    #[test]
    fn default_diagonal_extracts_from_full_jacobian() {
        let diag = Coupled.jacobian_diagonal(array![2.0, 3.0].view(), array![0.5].view());
        assert_relative_eq!(diag[0], 3.0);
        assert_relative_eq!(diag[1], 1.0);
    }

    #[test]
    fn references_forward_to_the_function() {
        fn dims<F: StepFunction<f64>>(f: F) -> (usize, usize) {
            (f.state_dim(), f.driver_dim())
        }

        let by_ref: &dyn Jacobian<f64> = &Coupled;
        assert_eq!(dims(by_ref), (2, 1));
        assert_eq!(
            by_ref.jacobian(array![1.0, 4.0].view(), array![0.0].view()),
            array![[4.0, 1.0], [0.0, 1.0]]
        );
    }
}
