//! The serial recurrence.
//!
//! [`evaluate`] steps through the sequence one state at a time. It is exact
//! but has linear depth. Solvers use it as ground truth, and callers can use
//! it directly when the sequence is short or parallel hardware is unavailable.

use ndarray::{Array2, ArrayView1, ArrayView2};

use deer_core::{Scalar, StepFunction};

use crate::dimension::{DimensionError, check_inputs, check_step_output};

/// Evaluates `h_t = f(h_{t-1}, e_t)` for every row of `drivers`.
///
/// Returns an `(L, D)` array whose row `t` is `h_{t+1}`.
///
/// # Errors
///
/// Returns a [`DimensionError`] if `initial` or `drivers` do not match the
/// dimensions declared by `f`, or if `f` returns a state of the wrong length.
#[tracing::instrument(skip_all, fields(len = drivers.nrows(), dim = f.state_dim()))]
pub fn evaluate<S, F>(
    f: &F,
    initial: ArrayView1<'_, S>,
    drivers: ArrayView2<'_, S>,
) -> Result<Array2<S>, DimensionError>
where
    S: Scalar,
    F: StepFunction<S> + ?Sized,
{
    let dim = f.state_dim();
    check_inputs(dim, f.driver_dim(), initial, drivers)?;

    let mut states = Array2::zeros((drivers.nrows(), dim));
    let mut prev = initial.to_owned();

    for (t, driver) in drivers.rows().into_iter().enumerate() {
        let next = f.step(prev.view(), driver);
        check_step_output(dim, next.len())?;
        states.row_mut(t).assign(&next);
        prev = next;
    }

    Ok(states)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use ndarray::{Array1, array};

    /// Exponential moving average: `h = 0.5·h + e`.
    struct Ema;

    impl StepFunction<f64> for Ema {
        fn state_dim(&self) -> usize {
            1
        }

        fn driver_dim(&self) -> usize {
            1
        }

        fn step(&self, x: ArrayView1<'_, f64>, e: ArrayView1<'_, f64>) -> Array1<f64> {
            array![0.5 * x[0] + e[0]]
        }
    }

    /// Returns a state one element too long.
    struct Broken;

    impl StepFunction<f64> for Broken {
        fn state_dim(&self) -> usize {
            1
        }

        fn driver_dim(&self) -> usize {
            1
        }

        fn step(&self, _x: ArrayView1<'_, f64>, _e: ArrayView1<'_, f64>) -> Array1<f64> {
            array![0.0, 0.0]
        }
    }

    #[test]
    fn steps_through_drivers_in_order() {
        let states = evaluate(&Ema, array![4.0].view(), array![[1.0], [0.0], [2.0]].view())
            .expect("shapes match");

        assert_eq!(states.dim(), (3, 1));
        assert_relative_eq!(states[[0, 0]], 3.0);
        assert_relative_eq!(states[[1, 0]], 1.5);
        assert_relative_eq!(states[[2, 0]], 2.75);
    }

    #[test]
    fn empty_drivers_give_empty_states() {
        let states = evaluate(&Ema, array![4.0].view(), Array2::zeros((0, 1)).view())
            .expect("shapes match");
        assert_eq!(states.dim(), (0, 1));
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let err = evaluate(&Ema, array![4.0, 1.0].view(), array![[1.0]].view()).unwrap_err();
        assert!(matches!(err, DimensionError::InitialState { .. }));

        let err = evaluate(&Ema, array![4.0].view(), array![[1.0, 2.0]].view()).unwrap_err();
        assert!(matches!(err, DimensionError::DriverWidth { .. }));

        let err = evaluate(&Broken, array![4.0].view(), array![[1.0]].view()).unwrap_err();
        assert_eq!(
            err,
            DimensionError::StepOutput {
                expected: 1,
                found: 2
            }
        );
    }
}
