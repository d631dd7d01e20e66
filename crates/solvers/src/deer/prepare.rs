use ndarray::{Array1, ArrayView1, ArrayView2};

use deer_core::{Jacobian, Scalar};

use crate::dimension::{DimensionError, check_inputs, check_step_output};

use super::Mode;

/// Validates every shape the solve depends on and returns `f(h_0, e_1)`.
///
/// The step function and Jacobian are each evaluated once, at the first
/// points the iteration will use, so a function that disagrees with its
/// declared dimensions fails here rather than partway through a scan.
///
/// For an empty sequence nothing is evaluated and `h_0` is returned.
pub(super) fn prepare<S, F>(
    f: &F,
    initial: ArrayView1<'_, S>,
    guess: ArrayView2<'_, S>,
    drivers: ArrayView2<'_, S>,
    mode: Mode,
) -> Result<Array1<S>, DimensionError>
where
    S: Scalar,
    F: Jacobian<S> + ?Sized,
{
    let dim = f.state_dim();
    check_inputs(dim, f.driver_dim(), initial, drivers)?;

    let len = drivers.nrows();
    if guess.dim() != (len, dim) {
        return Err(DimensionError::Guess {
            expected: (len, dim),
            found: guess.dim(),
        });
    }

    if len == 0 {
        return Ok(initial.to_owned());
    }

    let anchor = f.step(initial, drivers.row(0));
    check_step_output(dim, anchor.len())?;

    if len > 1 {
        let (state, driver) = (guess.row(0), drivers.row(1));
        match mode {
            Mode::Full => {
                let found = f.jacobian(state, driver).dim();
                if found != (dim, dim) {
                    return Err(DimensionError::Jacobian {
                        expected: (dim, dim),
                        found,
                    });
                }
            }
            Mode::Quasi => {
                let found = f.jacobian_diagonal(state, driver).len();
                if found != dim {
                    return Err(DimensionError::JacobianDiagonal {
                        expected: dim,
                        found,
                    });
                }
            }
        }
    }

    Ok(anchor)
}
