//! Learning-agent port - abstraction for online reinforcement learners
//!
//! A learning agent is driven one transition at a time by a training loop
//! (see [`crate::pipeline::TrainingPipeline`]). The port separates that loop
//! from the concrete value representation: a tabular Q-table or a linear
//! weight vector over features.

use super::ValueEstimator;

/// Online learner interacting with an environment episode by episode.
///
/// # Event Sequence
///
/// 1. `start_episode()`
/// 2. For each step: `choose_action(state)`, then
///    `observe_transition(state, action, next_state, reward)`
/// 3. `stop_episode()`
///
/// Once `episodes_so_far()` reaches the configured training count the agent
/// stops exploring and stops learning.
pub trait LearningAgent<S, A>: ValueEstimator<S, A> {
    /// Action to take in `state`, exploring with the agent's ε.
    ///
    /// Returns `None` when no action is legal.
    fn choose_action(&mut self, state: &S) -> Option<A>;

    /// Record one observed transition and apply exactly one update for it.
    fn observe_transition(&mut self, state: &S, action: &A, next_state: &S, reward: f64);

    /// Called before the first step of an episode.
    fn start_episode(&mut self);

    /// Called after the last step of an episode.
    fn stop_episode(&mut self);

    /// Number of completed episodes.
    fn episodes_so_far(&self) -> usize;

    /// Whether the agent is still within its training episodes.
    fn is_in_training(&self) -> bool;

    /// Get the agent's name.
    ///
    /// Used for identification in logging and reports.
    fn name(&self) -> &str;
}
