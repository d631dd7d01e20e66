//! Core traits and types for solving nonlinear recurrences in parallel.
//!
//! This crate defines the shared abstractions that solvers and observers
//! build on:
//!
//! - [`Scalar`]: the numeric element type, generic enough for dual numbers
//! - [`StepFunction`]: one step `h_t = f(h_{t-1}, e_t)` of a recurrence
//! - [`Jacobian`]: derivative of a step function with respect to its state
//! - [`Observer`]: receives solver events and optionally returns control actions
//!
//! The [`functions`] module provides ready-made step functions, including
//! [`DualJacobian`](functions::DualJacobian), which derives exact Jacobians
//! with forward-mode dual numbers.
//!
//! `num_dual` is re-exported so callers can name dual-number types and the
//! [`DualNum`](num_dual::DualNum) math functions without a direct dependency.

pub mod functions;

mod observer;
mod scalar;
mod step;

pub use observer::Observer;
pub use scalar::Scalar;
pub use step::{Jacobian, StepFunction};

pub use num_dual;
