use ndarray::{Array1, Array2};

use deer_core::Scalar;

/// One recurrence to solve as part of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence<S> {
    /// The fixed initial state `h_0`, length `D`.
    pub initial: Array1<S>,

    /// Initial estimate of `h_1..h_L`, shape `(L, D)`.
    pub guess: Array2<S>,

    /// Drivers `e_1..e_L`, shape `(L, N)`.
    pub drivers: Array2<S>,
}

impl<S: Scalar> Sequence<S> {
    /// Creates a sequence with an all-zero initial guess.
    pub fn new(initial: Array1<S>, drivers: Array2<S>) -> Self {
        let guess = Array2::zeros((drivers.nrows(), initial.len()));
        Self {
            initial,
            guess,
            drivers,
        }
    }

    /// Replaces the initial guess, e.g. to warm start from a previous solve.
    #[must_use]
    pub fn with_guess(self, guess: Array2<S>) -> Self {
        Self { guess, ..self }
    }

    /// Returns the sequence length `L`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drivers.nrows()
    }

    /// Returns true if the sequence has no timesteps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
