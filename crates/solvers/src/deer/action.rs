/// Control actions supported by the DEER solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop after the current iteration and return its estimate.
    StopEarly,
}
