//! Episode bookkeeping shared by the reinforcement-learning agents.

use tracing::{debug, info};

use crate::config::AgentParams;

/// Tracks episodes and the live learning parameters of an agent.
///
/// α and ε are the trained values until `num_training` episodes have
/// completed; from then on both are zero, so the agent exploits its
/// estimates and stops updating them.
#[derive(Debug, Clone)]
pub struct EpisodeTracker {
    alpha: f64,
    epsilon: f64,
    discount: f64,
    num_training: usize,
    episodes_so_far: usize,
    episode_rewards: f64,
    accum_train_rewards: f64,
    accum_test_rewards: f64,
}

impl EpisodeTracker {
    pub fn new(params: &AgentParams) -> Self {
        Self {
            alpha: params.alpha,
            epsilon: params.epsilon,
            discount: params.discount,
            num_training: params.num_training,
            episodes_so_far: 0,
            episode_rewards: 0.0,
            accum_train_rewards: 0.0,
            accum_test_rewards: 0.0,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn discount(&self) -> f64 {
        self.discount
    }

    pub fn start_episode(&mut self) {
        self.episode_rewards = 0.0;
    }

    pub fn record_reward(&mut self, reward: f64) {
        self.episode_rewards += reward;
    }

    /// Close the current episode; returns its undiscounted return.
    pub fn stop_episode(&mut self) -> f64 {
        let episode_return = self.episode_rewards;
        if self.is_in_training() {
            self.accum_train_rewards += episode_return;
        } else {
            self.accum_test_rewards += episode_return;
        }
        self.episodes_so_far += 1;
        debug!(
            episode = self.episodes_so_far,
            episode_return, "episode finished"
        );

        if self.episodes_so_far == self.num_training {
            info!(
                episodes = self.num_training,
                average_return = self.average_training_return(),
                "training complete"
            );
        }
        if self.episodes_so_far >= self.num_training {
            self.epsilon = 0.0;
            self.alpha = 0.0;
        }
        episode_return
    }

    pub fn episodes_so_far(&self) -> usize {
        self.episodes_so_far
    }

    pub fn is_in_training(&self) -> bool {
        self.episodes_so_far < self.num_training
    }

    /// Mean return over completed training episodes.
    pub fn average_training_return(&self) -> f64 {
        let completed = self.episodes_so_far.min(self.num_training);
        if completed == 0 {
            0.0
        } else {
            self.accum_train_rewards / completed as f64
        }
    }

    /// Mean return over completed episodes after training.
    pub fn average_test_return(&self) -> f64 {
        let completed = self.episodes_so_far.saturating_sub(self.num_training);
        if completed == 0 {
            0.0
        } else {
            self.accum_test_rewards / completed as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn learning_switches_off_after_training() {
        let params = AgentParams::default()
            .with_alpha(0.5)
            .with_epsilon(0.3)
            .with_num_training(2);
        let mut tracker = EpisodeTracker::new(&params);

        for reward in [1.0, 3.0] {
            assert!(tracker.is_in_training());
            tracker.start_episode();
            tracker.record_reward(reward);
            tracker.stop_episode();
        }

        assert!(!tracker.is_in_training());
        assert_eq!(tracker.alpha(), 0.0);
        assert_eq!(tracker.epsilon(), 0.0);
        assert_eq!(tracker.average_training_return(), 2.0);

        tracker.start_episode();
        tracker.record_reward(5.0);
        assert_eq!(tracker.stop_episode(), 5.0);
        assert_eq!(tracker.average_test_return(), 5.0);
    }

    #[test]
    fn parameters_hold_during_training() {
        let params = AgentParams::default().with_epsilon(0.3).with_num_training(5);
        let mut tracker = EpisodeTracker::new(&params);
        tracker.start_episode();
        tracker.stop_episode();
        assert_eq!(tracker.epsilon(), 0.3);
        assert_eq!(tracker.episodes_so_far(), 1);
    }
}
