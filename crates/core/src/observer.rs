/// Receives solver events and decides how iteration should proceed.
///
/// Observers let callers monitor or steer a solve without changing its API:
/// logging residuals, recording history, or stopping once a tolerance is met.
///
/// `observe` returns `Option<A>`. `Some(action)` requests a solver-specific
/// action and `None` lets the solver continue unchanged.
///
/// Closures implement `Observer` automatically, and `()` is a no-op observer
/// that always returns `None`.
pub trait Observer<E, A> {
    /// Observes a solver event and optionally returns a control action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
