use ndarray::{ArrayView1, ArrayView2};
use thiserror::Error;

/// Shape mismatches between a step function and the arrays passed to a solver.
///
/// These are detected before any iteration runs. In every variant `expected`
/// is the size implied by the step function and `found` is the size received.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DimensionError {
    /// The initial state length differs from the declared state dimension.
    #[error("initial state has length {found}, step function expects {expected}")]
    InitialState { expected: usize, found: usize },

    /// The driver columns differ from the declared driver dimension.
    #[error("drivers have width {found}, step function expects {expected}")]
    DriverWidth { expected: usize, found: usize },

    /// The guess is not `(L, D)`.
    #[error("state guess has shape {found:?}, expected {expected:?}")]
    Guess {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The step function returned a state of the wrong length.
    #[error("step function returned length {found}, expected {expected}")]
    StepOutput { expected: usize, found: usize },

    /// The Jacobian is not `D × D`.
    #[error("jacobian has shape {found:?}, expected {expected:?}")]
    Jacobian {
        expected: (usize, usize),
        found: (usize, usize),
    },

    /// The Jacobian diagonal does not have length `D`.
    #[error("jacobian diagonal has length {found}, expected {expected}")]
    JacobianDiagonal { expected: usize, found: usize },
}

/// Checks the initial state and driver sequence against declared dimensions.
pub(crate) fn check_inputs<S>(
    state_dim: usize,
    driver_dim: usize,
    initial: ArrayView1<'_, S>,
    drivers: ArrayView2<'_, S>,
) -> Result<(), DimensionError> {
    if initial.len() != state_dim {
        return Err(DimensionError::InitialState {
            expected: state_dim,
            found: initial.len(),
        });
    }
    if drivers.ncols() != driver_dim {
        return Err(DimensionError::DriverWidth {
            expected: driver_dim,
            found: drivers.ncols(),
        });
    }
    Ok(())
}

/// Checks the length of a vector produced by the step function.
pub(crate) fn check_step_output(expected: usize, found: usize) -> Result<(), DimensionError> {
    if expected == found {
        Ok(())
    } else {
        Err(DimensionError::StepOutput { expected, found })
    }
}
