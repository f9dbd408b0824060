//! Markov Decision Process abstraction.

use std::hash::Hash;

/// A finite Markov Decision Process.
///
/// For every non-terminal state and possible action the probabilities
/// returned by [`MarkovDecisionProcess::transition_states_and_probs`] sum to
/// one (within floating tolerance).
pub trait MarkovDecisionProcess {
    type State: Clone + Eq + Hash;
    type Action: Clone;

    /// Every state of the process, in a stable order.
    fn states(&self) -> Vec<Self::State>;

    /// State episodes begin in.
    fn start_state(&self) -> Self::State;

    /// Actions available in `state`; empty for terminal states.
    fn possible_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Successor distribution of taking `action` in `state`.
    fn transition_states_and_probs(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<(Self::State, f64)>;

    /// Reward for the transition `state --action--> next_state`.
    fn reward(
        &self,
        state: &Self::State,
        action: &Self::Action,
        next_state: &Self::State,
    ) -> f64;

    fn is_terminal(&self, state: &Self::State) -> bool;
}
