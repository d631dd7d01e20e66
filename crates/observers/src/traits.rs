//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasResidual`]: events that carry a residual value
//! - [`HasIteration`]: events that carry an iteration number
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use deer_core::Observer;
//! use deer_observers::traits::{CanStopEarly, HasResidual};
//!
//! struct Stalled {
//!     last: f64,
//! }
//!
//! impl<E: HasResidual, A: CanStopEarly> Observer<E, A> for Stalled {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let residual = event.residual();
//!         let stalled = residual >= self.last;
//!         self.last = residual;
//!         stalled.then(A::stop_early)
//!     }
//! }
//! ```

use deer_solvers::deer;

/// An event that carries a residual value.
pub trait HasResidual {
    /// Returns the residual for this event.
    ///
    /// Returns `f64::NAN` when no residual is available.
    fn residual(&self) -> f64;
}

/// An event that carries an iteration number.
pub trait HasIteration {
    /// Returns the iteration this event reports, starting at 1.
    fn iteration(&self) -> usize;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

impl<S> HasResidual for deer::Event<'_, S> {
    fn residual(&self) -> f64 {
        self.residual
    }
}

impl<S> HasIteration for deer::Event<'_, S> {
    fn iteration(&self) -> usize {
        self.iter
    }
}

impl CanStopEarly for deer::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
