use ndarray::{Array2, ArrayView1};

/// Indicates how the solver terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Ran every configured iteration.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a DEER solve.
#[derive(Debug, Clone)]
pub struct Solution<S> {
    /// How the solver terminated.
    pub status: Status,

    /// Final state estimate, shape `(L, D)`; row `t` is `h_{t+1}`.
    pub states: Array2<S>,

    /// Number of iterations completed.
    pub iters: usize,
}

impl<S> Solution<S> {
    /// Returns the last state `h_L`, or `None` for an empty sequence.
    #[must_use]
    pub fn final_state(&self) -> Option<ArrayView1<'_, S>> {
        self.states.nrows().checked_sub(1).map(|t| self.states.row(t))
    }
}
