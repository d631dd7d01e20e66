//! Reusable observers for the DEER solvers.
//!
//! This crate provides [`Observer`] implementations and the capability traits
//! they are written against, so the same observer works with any solver whose
//! events and actions implement those traits.
//!
//! # Observers
//!
//! - [`ResidualTolerance`]: stops once the residual falls below a tolerance
//! - [`TracingObserver`]: logs progress through `tracing`
//! - [`History`]: records the residual of every iteration
//!
//! [`Observer`]: deer_core::Observer

pub mod traits;

mod history;
mod logging;
mod tolerance;

pub use history::{History, Record, Recorder};
pub use logging::TracingObserver;
pub use tolerance::ResidualTolerance;
