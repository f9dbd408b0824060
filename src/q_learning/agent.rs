//! Tabular Q-learning agent
//!
//! Off-policy TD control: every observed transition moves `Q(s, a)` toward
//! the reward plus the discounted best value of the next state, whatever
//! action the agent goes on to take.

use std::hash::Hash;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use super::{episode::EpisodeTracker, q_table::QTable};
use crate::{
    Result,
    config::AgentParams,
    ports::{LearningAgent, ValueEstimator},
    utils::build_rng,
};

/// Legal-action function handed to a learning agent.
pub type ActionFn<S, A> = Box<dyn Fn(&S) -> Vec<A>>;

/// ε-greedy choice: a uniformly random legal action with probability ε,
/// otherwise the greedy action.
pub(crate) fn epsilon_greedy<A: Clone>(
    rng: &mut StdRng,
    epsilon: f64,
    legal_actions: &[A],
    greedy: impl FnOnce() -> Option<A>,
) -> Option<A> {
    if legal_actions.is_empty() {
        return None;
    }
    if rng.random::<f64>() < epsilon {
        legal_actions.choose(rng).cloned()
    } else {
        greedy()
    }
}

/// Q-learning agent over a tabular Q-function
///
/// # Examples
///
/// ```
/// use gridmind::{config::AgentParams, q_learning::QLearningAgent};
///
/// let params = AgentParams::default().with_alpha(0.5).with_discount(1.0);
/// let mut agent = QLearningAgent::new(params, |s: &u8| {
///     if *s == 0 { vec!['r'] } else { vec![] }
/// })
/// .unwrap();
///
/// agent.update(&0, &'r', &1, 10.0);
/// assert_eq!(agent.q_value(&0, &'r'), 5.0);
/// ```
pub struct QLearningAgent<S, A> {
    q_table: QTable<S, A>,
    actions: ActionFn<S, A>,
    episodes: EpisodeTracker,
    rng: StdRng,
}

impl<S, A> QLearningAgent<S, A>
where
    S: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `params` - α, γ, ε, training episodes and optional seed
    /// * `actions` - legal actions of a state, empty when terminal
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] if a parameter is out of range.
    pub fn new(params: AgentParams, actions: impl Fn(&S) -> Vec<A> + 'static) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            q_table: QTable::new(),
            actions: Box::new(actions),
            episodes: EpisodeTracker::new(&params),
            rng: build_rng(params.seed),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn legal_actions(&self, state: &S) -> Vec<A> {
        (self.actions)(state)
    }

    pub fn q_value(&self, state: &S, action: &A) -> f64 {
        self.q_table.get(state, action)
    }

    /// `max_a Q(state, a)`, 0.0 without legal actions.
    pub fn value(&self, state: &S) -> f64 {
        self.q_table.max_q(state, &self.legal_actions(state))
    }

    /// First legal action with the highest Q-value.
    pub fn policy(&self, state: &S) -> Option<A> {
        self.q_table.greedy_action(state, &self.legal_actions(state))
    }

    /// ε-greedy action for `state`.
    pub fn action(&mut self, state: &S) -> Option<A> {
        let legal = self.legal_actions(state);
        let epsilon = self.episodes.epsilon();
        let greedy = self.q_table.greedy_action(state, &legal);
        epsilon_greedy(&mut self.rng, epsilon, &legal, || greedy)
    }

    /// Q-learning update rule
    ///
    /// Q(s,a) ← (1 - α) Q(s,a) + α [r + γ max_a' Q(s',a')]
    pub fn update(&mut self, state: &S, action: &A, next_state: &S, reward: f64) {
        let alpha = self.episodes.alpha();
        let sample = reward + self.episodes.discount() * self.value(next_state);
        let current = self.q_value(state, action);
        let updated = (1.0 - alpha) * current + alpha * sample;
        self.q_table.set(state.clone(), action.clone(), updated);
    }

    pub fn alpha(&self) -> f64 {
        self.episodes.alpha()
    }

    pub fn epsilon(&self) -> f64 {
        self.episodes.epsilon()
    }

    pub fn discount(&self) -> f64 {
        self.episodes.discount()
    }

    pub fn q_table(&self) -> &QTable<S, A> {
        &self.q_table
    }

    pub fn episodes(&self) -> &EpisodeTracker {
        &self.episodes
    }
}

impl<S, A> ValueEstimator<S, A> for QLearningAgent<S, A>
where
    S: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    fn value(&self, state: &S) -> f64 {
        QLearningAgent::value(self, state)
    }

    fn q_value(&self, state: &S, action: &A) -> f64 {
        QLearningAgent::q_value(self, state, action)
    }

    fn policy(&self, state: &S) -> Option<A> {
        QLearningAgent::policy(self, state)
    }
}

impl<S, A> LearningAgent<S, A> for QLearningAgent<S, A>
where
    S: Clone + Eq + Hash,
    A: Clone + Eq + Hash,
{
    fn choose_action(&mut self, state: &S) -> Option<A> {
        self.action(state)
    }

    fn observe_transition(&mut self, state: &S, action: &A, next_state: &S, reward: f64) {
        self.episodes.record_reward(reward);
        self.update(state, action, next_state, reward);
    }

    fn start_episode(&mut self) {
        self.episodes.start_episode();
    }

    fn stop_episode(&mut self) {
        self.episodes.stop_episode();
    }

    fn episodes_so_far(&self) -> usize {
        self.episodes.episodes_so_far()
    }

    fn is_in_training(&self) -> bool {
        self.episodes.is_in_training()
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }
}
