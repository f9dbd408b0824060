//! Environment port - the world a learning agent acts in

use crate::Result;

/// A stateful, episodic environment.
pub trait Environment {
    type State: Clone;
    type Action: Clone;

    /// Return to the start state of a new episode.
    fn reset(&mut self);

    fn current_state(&self) -> Self::State;

    /// Actions legal in `state`; empty in terminal states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// Apply `action` to the current state, returning the next state and the
    /// reward of the transition.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] if the current state is terminal.
    fn step(&mut self, action: &Self::Action) -> Result<(Self::State, f64)>;

    /// Whether the current state ends the episode.
    fn is_terminal(&self) -> bool;
}
