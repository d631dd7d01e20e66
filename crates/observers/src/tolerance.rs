use deer_core::Observer;

use crate::traits::{CanStopEarly, HasIteration, HasResidual};

/// Stops a solve once the residual drops below a tolerance.
///
/// DEER runs a fixed number of iterations by default. Pair this observer with
/// a generous iteration budget to stop as soon as the estimate settles
/// instead. The residual is compared with `<=`, so a tolerance of zero stops
/// only on an exact fixed point.
///
/// A NaN residual never triggers a stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResidualTolerance {
    tolerance: f64,
    min_iters: usize,
}

impl ResidualTolerance {
    /// Creates an observer that stops once the residual is at most `tolerance`.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            min_iters: 1,
        }
    }

    /// Requires at least `min_iters` iterations before stopping.
    #[must_use]
    pub fn with_min_iters(self, min_iters: usize) -> Self {
        Self { min_iters, ..self }
    }

    /// Returns the tolerance.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the minimum number of iterations.
    #[must_use]
    pub fn min_iters(&self) -> usize {
        self.min_iters
    }
}

impl<E, A> Observer<E, A> for ResidualTolerance
where
    E: HasResidual + HasIteration,
    A: CanStopEarly,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let settled = event.iteration() >= self.min_iters && event.residual() <= self.tolerance;
        settled.then(A::stop_early)
    }
}
