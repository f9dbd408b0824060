//! Episodic training loop for learning agents

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    ports::{Environment, LearningAgent, Observer},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Episodes to run, training and testing combined
    pub episodes: usize,

    /// Step cap per episode; an episode hitting it is cut off
    pub max_steps: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 100,
            max_steps: 1000,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Total episodes run
    pub episodes: usize,

    /// Episodes run while the agent was still learning
    pub training_episodes: usize,

    /// Undiscounted return of every episode, in order
    pub returns: Vec<f64>,

    /// Transitions observed across all episodes
    pub total_steps: usize,

    /// Episodes cut off by the step cap
    pub truncated: usize,
}

impl TrainingResult {
    /// Mean return over the training episodes
    pub fn average_training_return(&self) -> f64 {
        mean(&self.returns[..self.training_split()])
    }

    /// Mean return over the episodes after training
    pub fn average_test_return(&self) -> f64 {
        mean(&self.returns[self.training_split()..])
    }

    fn training_split(&self) -> usize {
        self.training_episodes.min(self.returns.len())
    }

    /// Check that the episode counts agree with the recorded returns
    pub fn validate(&self) -> Result<()> {
        if self.returns.len() != self.episodes {
            return Err(Error::invalid_config(format!(
                "result records {} returns for {} episodes",
                self.returns.len(),
                self.episodes
            )));
        }
        if self.training_episodes > self.episodes {
            return Err(Error::invalid_config(format!(
                "training episodes ({}) exceed total episodes ({})",
                self.training_episodes, self.episodes
            )));
        }
        Ok(())
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open {}", path.display()),
            source,
        })?;
        let result: Self = serde_json::from_reader(file)?;
        result.validate()?;
        Ok(result)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Training pipeline driving one agent through one environment
pub struct TrainingPipeline<'a> {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer + 'a>>,
}

impl<'a> TrainingPipeline<'a> {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer + 'a>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run the configured number of episodes
    ///
    /// Each episode resets the environment, then alternates
    /// `choose_action` / `step` / `observe_transition` until the environment
    /// is terminal, the agent has no action, or the step cap is reached.
    pub fn run<E, L>(&mut self, env: &mut E, agent: &mut L) -> Result<TrainingResult>
    where
        E: Environment,
        L: LearningAgent<E::State, E::Action> + ?Sized,
    {
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        let mut result = TrainingResult {
            episodes: 0,
            training_episodes: 0,
            returns: Vec::with_capacity(self.config.episodes),
            total_steps: 0,
            truncated: 0,
        };

        for episode in 0..self.config.episodes {
            if agent.is_in_training() {
                result.training_episodes += 1;
            }
            let (episode_return, steps, truncated) = self.run_episode(episode, env, agent)?;
            result.returns.push(episode_return);
            result.total_steps += steps;
            result.episodes += 1;
            if truncated {
                result.truncated += 1;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        info!(
            agent = agent.name(),
            episodes = result.episodes,
            average_training_return = result.average_training_return(),
            average_test_return = result.average_test_return(),
            "training run finished"
        );
        Ok(result)
    }

    fn run_episode<E, L>(
        &mut self,
        episode: usize,
        env: &mut E,
        agent: &mut L,
    ) -> Result<(f64, usize, bool)>
    where
        E: Environment,
        L: LearningAgent<E::State, E::Action> + ?Sized,
    {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }
        env.reset();
        agent.start_episode();

        let mut episode_return = 0.0;
        let mut steps = 0;
        while !env.is_terminal() {
            if steps == self.config.max_steps {
                warn!(episode, steps, "episode hit the step cap");
                break;
            }
            let state = env.current_state();
            let Some(action) = agent.choose_action(&state) else {
                debug!(episode, steps, "agent has no legal action");
                break;
            };
            let (next_state, reward) = env.step(&action)?;
            agent.observe_transition(&state, &action, &next_state, reward);
            episode_return += reward;

            for observer in &mut self.observers {
                observer.on_step(episode, steps, reward)?;
            }
            steps += 1;
        }
        let truncated = !env.is_terminal() && steps == self.config.max_steps;

        agent.stop_episode();
        for observer in &mut self.observers {
            observer.on_episode_end(episode, episode_return)?;
        }
        Ok((episode_return, steps, truncated))
    }
}
