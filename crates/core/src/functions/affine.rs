use ndarray::{Array1, Array2, ArrayView1};
use thiserror::Error;

use crate::{Jacobian, Scalar, StepFunction};

/// An affine step `f(x, e) = A·x + B·e + c`.
///
/// `A` is the `D × D` transition, `B` the `D × N` input matrix, and `c` a
/// length-`D` bias. The Jacobian is `A` everywhere, so linearization is exact
/// and a single solver iteration reproduces the serial recurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineStep<S> {
    transition: Array2<S>,
    input: Array2<S>,
    bias: Array1<S>,
}

/// Shape errors when constructing an [`AffineStep`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AffineStepError {
    /// The transition matrix is not square.
    #[error("transition must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// The input matrix row count differs from the state dimension.
    #[error("input matrix must have {expected} rows, got {found}")]
    InputRows { expected: usize, found: usize },

    /// The bias length differs from the state dimension.
    #[error("bias must have length {expected}, got {found}")]
    BiasLength { expected: usize, found: usize },
}

impl<S: Scalar> AffineStep<S> {
    /// Creates an affine step after checking that the shapes agree.
    ///
    /// # Errors
    ///
    /// Returns an error if `transition` is not square, or if `input` or `bias`
    /// do not match its dimension.
    pub fn new(
        transition: Array2<S>,
        input: Array2<S>,
        bias: Array1<S>,
    ) -> Result<Self, AffineStepError> {
        let (rows, cols) = transition.dim();
        if rows != cols {
            return Err(AffineStepError::NotSquare { rows, cols });
        }
        if input.nrows() != rows {
            return Err(AffineStepError::InputRows {
                expected: rows,
                found: input.nrows(),
            });
        }
        if bias.len() != rows {
            return Err(AffineStepError::BiasLength {
                expected: rows,
                found: bias.len(),
            });
        }

        Ok(Self {
            transition,
            input,
            bias,
        })
    }

    /// Creates an affine step whose driver is added directly to the state,
    /// `f(x, e) = A·x + e`.
    ///
    /// # Errors
    ///
    /// Returns an error if `transition` is not square.
    pub fn driven(transition: Array2<S>) -> Result<Self, AffineStepError> {
        let dim = transition.nrows();
        Self::new(transition, Array2::eye(dim), Array1::zeros(dim))
    }

    /// Returns the transition matrix `A`.
    #[must_use]
    pub fn transition(&self) -> &Array2<S> {
        &self.transition
    }

    /// Returns the input matrix `B`.
    #[must_use]
    pub fn input(&self) -> &Array2<S> {
        &self.input
    }

    /// Returns the bias `c`.
    #[must_use]
    pub fn bias(&self) -> &Array1<S> {
        &self.bias
    }
}

impl<S: Scalar> StepFunction<S> for AffineStep<S> {
    fn state_dim(&self) -> usize {
        self.transition.nrows()
    }

    fn driver_dim(&self) -> usize {
        self.input.ncols()
    }

    fn step(&self, state: ArrayView1<'_, S>, driver: ArrayView1<'_, S>) -> Array1<S> {
        self.transition.dot(&state) + self.input.dot(&driver) + &self.bias
    }
}

impl<S: Scalar> Jacobian<S> for AffineStep<S> {
    fn jacobian(&self, _state: ArrayView1<'_, S>, _driver: ArrayView1<'_, S>) -> Array2<S> {
        self.transition.clone()
    }
}
