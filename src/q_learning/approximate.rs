//! Approximate Q-learning with a linear function over features.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use tracing::trace;

use super::{
    agent::{ActionFn, epsilon_greedy},
    episode::EpisodeTracker,
    features::FeatureExtractor,
    q_table::{argmax_first, max_value},
};
use crate::{
    Result,
    config::AgentParams,
    ports::{LearningAgent, ValueEstimator},
    utils::build_rng,
};

/// Q-learning agent with `Q(s, a) = Σ_f w_f · f(s, a)`.
///
/// Weights start at zero; a feature never seen contributes nothing.
pub struct ApproximateQAgent<S, A, E> {
    extractor: E,
    weights: BTreeMap<String, f64>,
    actions: ActionFn<S, A>,
    episodes: EpisodeTracker,
    rng: StdRng,
}

impl<S, A, E> ApproximateQAgent<S, A, E>
where
    A: Clone,
    E: FeatureExtractor<S, A>,
{
    pub fn new(
        params: AgentParams,
        extractor: E,
        actions: impl Fn(&S) -> Vec<A> + 'static,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            extractor,
            weights: BTreeMap::new(),
            actions: Box::new(actions),
            episodes: EpisodeTracker::new(&params),
            rng: build_rng(params.seed),
        })
    }

    pub fn legal_actions(&self, state: &S) -> Vec<A> {
        (self.actions)(state)
    }

    /// Dot product of the weights with the features of `(state, action)`.
    pub fn q_value(&self, state: &S, action: &A) -> f64 {
        self.extractor
            .features(state, action)
            .iter()
            .map(|(name, value)| self.weight(name) * value)
            .sum()
    }

    pub fn value(&self, state: &S) -> f64 {
        max_value(&self.legal_actions(state), |action| {
            self.q_value(state, action)
        })
    }

    pub fn policy(&self, state: &S) -> Option<A> {
        argmax_first(&self.legal_actions(state), |action| {
            self.q_value(state, action)
        })
    }

    pub fn action(&mut self, state: &S) -> Option<A> {
        let legal = self.legal_actions(state);
        let epsilon = self.episodes.epsilon();
        let greedy = argmax_first(&legal, |action| self.q_value(state, action));
        epsilon_greedy(&mut self.rng, epsilon, &legal, || greedy)
    }

    /// w_f ← w_f + α · correction · f(s, a), where
    /// correction = r + γ V(s') − Q(s, a) is fixed before any weight moves.
    pub fn update(&mut self, state: &S, action: &A, next_state: &S, reward: f64) {
        let target = reward + self.episodes.discount() * self.value(next_state);
        let correction = target - self.q_value(state, action);
        let alpha = self.episodes.alpha();
        for (name, value) in self.extractor.features(state, action) {
            *self.weights.entry(name).or_insert(0.0) += alpha * correction * value;
        }
        trace!(correction, "approximate q update");
    }

    pub fn weight(&self, feature: &str) -> f64 {
        self.weights.get(feature).copied().unwrap_or(0.0)
    }

    pub fn weights(&self) -> &BTreeMap<String, f64> {
        &self.weights
    }

    pub fn episodes(&self) -> &EpisodeTracker {
        &self.episodes
    }
}

impl<S, A, E> ValueEstimator<S, A> for ApproximateQAgent<S, A, E>
where
    A: Clone,
    E: FeatureExtractor<S, A>,
{
    fn value(&self, state: &S) -> f64 {
        ApproximateQAgent::value(self, state)
    }

    fn q_value(&self, state: &S, action: &A) -> f64 {
        ApproximateQAgent::q_value(self, state, action)
    }

    fn policy(&self, state: &S) -> Option<A> {
        ApproximateQAgent::policy(self, state)
    }
}

impl<S, A, E> LearningAgent<S, A> for ApproximateQAgent<S, A, E>
where
    A: Clone,
    E: FeatureExtractor<S, A>,
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
        "Approximate Q-Learning"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::{Features, IdentityExtractor, QLearningAgent};

    fn actions(state: &u8) -> Vec<char> {
        if *state == 0 { vec!['l', 'r'] } else { Vec::new() }
    }

    fn shared_features(_state: &u8, action: &char) -> Features {
        let mut features = Features::new();
        features.insert("bias".to_string(), 1.0);
        features.insert("right".to_string(), if *action == 'r' { 2.0 } else { 0.0 });
        features
    }

    #[test]
    fn correction_is_fixed_before_weights_move() {
        let params = AgentParams::default().with_alpha(0.5).with_discount(1.0);
        let mut agent = ApproximateQAgent::new(params, shared_features, actions).unwrap();
        agent.update(&0, &'r', &1, 4.0);

        // correction = 4 for both features
        assert_eq!(agent.weight("bias"), 2.0);
        assert_eq!(agent.weight("right"), 4.0);
        assert_eq!(agent.q_value(&0, &'r'), 10.0);
        assert_eq!(agent.q_value(&0, &'l'), 2.0);
        assert_eq!(agent.policy(&0), Some('r'));
    }

    #[test]
    fn identity_features_match_tabular() {
        let params = AgentParams::default().with_alpha(0.5).with_discount(0.9);
        let mut approx =
            ApproximateQAgent::new(params.clone(), IdentityExtractor, actions).unwrap();
        let mut tabular = QLearningAgent::new(params, actions).unwrap();

        let transitions = [(0, 'l', 0, -1.0), (0, 'r', 1, 10.0), (0, 'l', 0, 0.5)];
        for _ in 0..3 {
            for (s, a, next, r) in transitions {
                approx.update(&s, &a, &next, r);
                tabular.update(&s, &a, &next, r);
            }
        }
        for a in ['l', 'r'] {
            assert!((approx.q_value(&0, &a) - tabular.q_value(&0, &a)).abs() < 1e-12);
        }
    }

    #[test]
    fn empty_state_has_zero_value() {
        let agent =
            ApproximateQAgent::new(AgentParams::default(), IdentityExtractor, actions).unwrap();
        assert_eq!(agent.value(&1), 0.0);
        assert_eq!(agent.policy(&1), None);
        assert!(agent.weights().is_empty());
    }
}
