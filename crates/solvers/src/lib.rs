//! Parallel-in-time solvers for nonlinear recurrences.
//!
//! A recurrence `h_t = f(h_{t-1}, e_t)` is normally evaluated one step at a
//! time. The [`deer`] solver removes that serial dependency: each iteration
//! linearizes `f` around the current estimate of every state, then solves the
//! resulting linear recurrence exactly with a parallel prefix scan.
//!
//! # Modules
//!
//! - [`affine`]: affine operators and their associative composition
//! - [`scan`]: a generic associative scan with `O(log L)` depth
//! - [`linearize`]: builds one affine operator per timestep
//! - [`stabilize`]: policies for non-finite values produced by a scan
//! - [`sequential`]: the serial recurrence, used as a baseline
//! - [`deer`]: the fixed-point solver tying these together

pub mod affine;
pub mod deer;
pub mod linearize;
pub mod scan;
pub mod sequential;
pub mod stabilize;

mod dimension;

pub use dimension::DimensionError;
