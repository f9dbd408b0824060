//! Value-estimator port - shared read surface of value-based agents

/// Read access to an agent's current value estimates.
///
/// Implemented by value iteration and by both Q-learning agents, so that
/// reporting code (policy printouts, comparisons) works with any of them.
/// Repeated calls without an intervening update return identical results.
pub trait ValueEstimator<S, A> {
    /// `max_a Q(state, a)` over the available actions, 0.0 when there are none.
    fn value(&self, state: &S) -> f64;

    /// Estimated return of taking `action` in `state`.
    fn q_value(&self, state: &S, action: &A) -> f64;

    /// The action judged best in `state`, or `None` when no action exists.
    fn policy(&self, state: &S) -> Option<A>;
}
