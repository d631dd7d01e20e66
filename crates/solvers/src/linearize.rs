//! Per-timestep linearization of a step function.
//!
//! Around a point `x` with driver `e`, the tangent affine map of `f` is
//!
//! ```text
//! f(y, e) ≈ J·y + (f(x, e) − J·x),    J = ∂f/∂x at (x, e)
//! ```
//!
//! [`DenseAffine`] keeps the full Jacobian; [`DiagonalAffine`] keeps only its
//! diagonal, which is cheaper to compute and to compose but a weaker
//! approximation when states are coupled.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rayon::prelude::*;

use deer_core::{Jacobian, Scalar};

use crate::affine::{AffineOperator, DenseAffine, DiagonalAffine};

/// An affine operator that can be built as the tangent of a step function.
pub trait Tangent<S: Scalar>: AffineOperator<S> {
    /// Returns the tangent map of `f` at `(state, driver)`.
    #[must_use]
    fn tangent<F>(f: &F, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Self
    where
        F: Jacobian<S> + ?Sized;
}

impl<S: Scalar> Tangent<S> for DenseAffine<S> {
    fn tangent<F>(f: &F, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Self
    where
        F: Jacobian<S> + ?Sized,
    {
        let value = f.step(state, driver);
        let linear = f.jacobian(state, driver);
        let offset = value - linear.dot(&state);
        DenseAffine::new(linear, offset)
    }
}

impl<S: Scalar> Tangent<S> for DiagonalAffine<S> {
    fn tangent<F>(f: &F, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Self
    where
        F: Jacobian<S> + ?Sized,
    {
        let value = f.step(state, driver);
        let linear = f.jacobian_diagonal(state, driver);
        let offset = value - &linear * &state;
        DiagonalAffine::new(linear, offset)
    }
}

/// Builds one operator per timestep from the current state estimate.
///
/// `anchor` is `f(h_0, e_1)`. Operator 0 is the constant map to `anchor`,
/// since `h_0` is known exactly. For `t ≥ 1`, operator `t` is the tangent of
/// `f` at `(estimate[t - 1], drivers[t])`, the linearized transition into
/// `h_{t+1}`.
///
/// The tangents have no dependency on each other. With `parallel` set they are
/// evaluated on the rayon thread pool; the result is the same either way.
pub fn linearize<S, Op, F>(
    f: &F,
    anchor: &Array1<S>,
    drivers: ArrayView2<'_, S>,
    estimate: ArrayView2<'_, S>,
    parallel: bool,
) -> Vec<Op>
where
    S: Scalar,
    Op: Tangent<S>,
    F: Jacobian<S> + Sync + ?Sized,
{
    let len = drivers.nrows();
    if len == 0 {
        return Vec::new();
    }

    let tangent = |t: usize| Op::tangent(f, estimate.row(t - 1), drivers.row(t));

    let mut ops = Vec::with_capacity(len);
    ops.push(Op::constant(anchor.clone()));
    if parallel {
        ops.par_extend((1..len).into_par_iter().map(tangent));
    } else {
        ops.extend((1..len).map(tangent));
    }
    ops
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    use deer_core::StepFunction;

    /// `f(x, e) = [x0² + e0, x0·x1]`.
    struct Quadratic;

    impl StepFunction<f64> for Quadratic {
        fn state_dim(&self) -> usize {
            2
        }

        fn driver_dim(&self) -> usize {
            1
        }

        fn step(&self, x: ArrayView1<'_, f64>, e: ArrayView1<'_, f64>) -> Array1<f64> {
            array![x[0] * x[0] + e[0], x[0] * x[1]]
        }
    }

    impl Jacobian<f64> for Quadratic {
        fn jacobian(&self, x: ArrayView1<'_, f64>, _e: ArrayView1<'_, f64>) -> Array2<f64> {
            array![[2.0 * x[0], 0.0], [x[1], x[0]]]
        }
    }

    #[test]
    fn dense_tangent_matches_function_at_linearization_point() {
        let x = array![1.5, -2.0];
        let e = array![0.25];

        let op = DenseAffine::tangent(&Quadratic, x.view(), e.view());
        let at_x = op.apply(x.view());
        let expected = Quadratic.step(x.view(), e.view());

        assert_relative_eq!(at_x[0], expected[0], epsilon = 1e-12);
        assert_relative_eq!(at_x[1], expected[1], epsilon = 1e-12);
        assert_eq!(op.linear, array![[3.0, 0.0], [-2.0, 1.5]]);
    }

    #[test]
    fn diagonal_tangent_keeps_only_diagonal() {
        let x = array![1.5, -2.0];
        let e = array![0.25];

        let op = DiagonalAffine::tangent(&Quadratic, x.view(), e.view());

        assert_eq!(op.linear, array![3.0, 1.5]);
        // offset = f(x) - diag ⊙ x
        assert_relative_eq!(op.offset[0], 2.5 - 4.5, epsilon = 1e-12);
        assert_relative_eq!(op.offset[1], -3.0 + 3.0, epsilon = 1e-12);
    }

    #[test]
    fn first_operator_is_constant_anchor() {
        let drivers = array![[0.5], [1.0], [2.0]];
        let estimate = array![[1.0, 1.0], [2.0, 3.0], [0.0, 0.0]];
        let anchor = array![7.0, 8.0];

        let ops: Vec<DenseAffine<f64>> =
            linearize(&Quadratic, &anchor, drivers.view(), estimate.view(), true);

        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0].linear, Array2::zeros((2, 2)));
        assert_eq!(ops[0].offset, anchor);
        // Operator 2 is linearized around estimate[1] with driver[2].
        assert_eq!(ops[2].linear, array![[4.0, 0.0], [3.0, 2.0]]);
    }

    #[test]
    fn parallel_and_serial_agree() {
        let drivers = array![[0.5], [1.0], [2.0], [-1.0], [0.0]];
        let estimate = array![[1.0, 1.0], [2.0, 3.0], [0.5, -0.5], [4.0, 1.0], [0.0, 0.0]];
        let anchor = array![0.0, 0.0];

        let parallel: Vec<DiagonalAffine<f64>> =
            linearize(&Quadratic, &anchor, drivers.view(), estimate.view(), true);
        let serial: Vec<DiagonalAffine<f64>> =
            linearize(&Quadratic, &anchor, drivers.view(), estimate.view(), false);

        assert_eq!(parallel, serial);
    }

    #[test]
    fn empty_sequence_has_no_operators() {
        let drivers = Array2::<f64>::zeros((0, 1));
        let estimate = Array2::<f64>::zeros((0, 2));

        let ops: Vec<DenseAffine<f64>> = linearize(
            &Quadratic,
            &array![0.0, 0.0],
            drivers.view(),
            estimate.view(),
            false,
        );

        assert!(ops.is_empty());
    }
}
