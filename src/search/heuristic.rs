//! Heuristic helpers for informed search.

/// The trivial heuristic: always zero. A* with it behaves as uniform-cost.
///
/// Any heuristic is a `Fn(&State, &Problem) -> f64`; A* returns optimal
/// paths only when it never overestimates.
pub fn null_heuristic<S, P>(_state: &S, _problem: &P) -> f64 {
    0.0
}
