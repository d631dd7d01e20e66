use ndarray::ArrayView2;

/// Event emitted by the DEER solver after each iteration.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a, S> {
    /// Iteration number, starting at 1.
    pub iter: usize,

    /// The new state estimate, shape `(L, D)`; row `t` is `h_{t+1}`.
    pub states: ArrayView2<'a, S>,

    /// Largest absolute change of any entry from the previous estimate.
    pub residual: f64,

    /// Number of entries replaced by stabilization in this iteration.
    pub replaced: usize,
}
