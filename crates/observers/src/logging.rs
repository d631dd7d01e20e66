use deer_core::Observer;
use tracing::info;

use crate::traits::{HasIteration, HasResidual};

/// Logs solver progress at `info` level.
///
/// Logs every `every`-th iteration (every iteration by default). Never
/// returns an action. The library emits its own `debug` events; this observer
/// is for callers who want progress at a higher level without changing
/// their subscriber filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracingObserver {
    every: usize,
}

impl TracingObserver {
    /// Creates an observer that logs every iteration.
    #[must_use]
    pub fn new() -> Self {
        Self { every: 1 }
    }

    /// Logs only iterations divisible by `every`. Zero is treated as one.
    #[must_use]
    pub fn every(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }

    fn should_log(&self, iter: usize) -> bool {
        iter % self.every == 0
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, A> Observer<E, A> for TracingObserver
where
    E: HasResidual + HasIteration,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let iter = event.iteration();
        if self.should_log(iter) {
            info!(iter, residual = event.residual(), "solver progress");
        }
        None
    }
}
