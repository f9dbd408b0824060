//! Search problem abstraction consumed by the graph-search engine.

use std::hash::Hash;

/// One outgoing edge of a search state.
#[derive(Debug, Clone, PartialEq)]
pub struct Successor<S, A> {
    /// State reached by taking `action`
    pub state: S,
    /// Action leading to `state`
    pub action: A,
    /// Cost of this single step
    pub cost: f64,
}

impl<S, A> Successor<S, A> {
    pub fn new(state: S, action: A, cost: f64) -> Self {
        Self {
            state,
            action,
            cost,
        }
    }
}

/// A search space the engine can explore.
///
/// States need value semantics and hashing so the visited set can test
/// membership. Successors are explored in the order they are returned, which
/// decides tie-breaking between equally good paths.
pub trait SearchProblem {
    /// A point in the search space
    type State: Clone + Eq + Hash;

    /// A label on the edge between two states
    type Action: Clone;

    /// The state the search begins from.
    fn starting_state(&self) -> Self::State;

    /// Whether `state` satisfies the goal test.
    fn is_goal(&self, state: &Self::State) -> bool;

    /// Outgoing edges of `state`, in exploration order.
    fn successor_states(&self, state: &Self::State) -> Vec<Successor<Self::State, Self::Action>>;

    /// Total cost of following `actions` from the starting state.
    fn actions_cost(&self, actions: &[Self::Action]) -> f64;

    /// Number of states the problem has expanded so far, for problems that
    /// count calls to [`SearchProblem::successor_states`].
    fn expanded(&self) -> usize {
        0
    }
}
