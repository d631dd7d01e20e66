use deer_core::Observer;

use crate::traits::{HasIteration, HasResidual};

/// One recorded iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    /// Iteration number, starting at 1.
    pub iter: usize,

    /// Residual reported for that iteration.
    pub residual: f64,
}

/// Records the residual of every iteration of a solve.
///
/// Pass [`History::recorder`] as the observer, then inspect the history after
/// the solve returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    records: Vec<Record>,
}

/// An observer that appends to a [`History`] and never acts.
#[derive(Debug)]
pub struct Recorder<'h> {
    history: &'h mut History,
}

impl History {
    /// Creates an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an observer that records into this history.
    pub fn recorder(&mut self) -> Recorder<'_> {
        Recorder { history: self }
    }

    /// Returns the recorded iterations in order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the residual of the last recorded iteration.
    #[must_use]
    pub fn last_residual(&self) -> Option<f64> {
        self.records.last().map(|r| r.residual)
    }

    /// Returns true if no residual increased from one iteration to the next.
    #[must_use]
    pub fn is_monotone(&self) -> bool {
        self.records.windows(2).all(|w| w[1].residual <= w[0].residual)
    }
}

impl<E, A> Observer<E, A> for Recorder<'_>
where
    E: HasResidual + HasIteration,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self.history.records.push(Record {
            iter: event.iteration(),
            residual: event.residual(),
        });
        None
    }
}
