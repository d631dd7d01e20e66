//! Ready-made step functions.
//!
//! - [`AffineStep`]: `f(x, e) = A·x + B·e + c` with an exact Jacobian
//! - [`DualJacobian`]: wraps a [`GenericStep`] and derives its exact Jacobian
//!   with dual numbers
//! - [`FiniteDifference`]: wraps an `f64` closure and approximates its
//!   Jacobian, for functions that cannot be written generically

mod affine;
mod dual;
mod finite_difference;

pub use affine::{AffineStep, AffineStepError};
pub use dual::{DualJacobian, GenericStep};
pub use finite_difference::{FiniteDifference, FiniteDifferenceError};
