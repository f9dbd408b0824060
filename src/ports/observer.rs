//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training loop
//! to progress bars or metric sinks.

use crate::Result;

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(episode, step, reward)` - For each transition
///    - `on_episode_end(episode, episode_return)`
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use gridmind::ports::Observer;
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         _episode_return: f64,
///     ) -> gridmind::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when training starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each observed transition.
    fn on_step(&mut self, _episode: usize, _step: usize, _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends with the undiscounted sum of its rewards.
    fn on_episode_end(&mut self, _episode: usize, _episode_return: f64) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finish progress bars or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        (**self).on_training_start(total_episodes)
    }

    fn on_episode_start(&mut self, episode: usize) -> Result<()> {
        (**self).on_episode_start(episode)
    }

    fn on_step(&mut self, episode: usize, step: usize, reward: f64) -> Result<()> {
        (**self).on_step(episode, step, reward)
    }

    fn on_episode_end(&mut self, episode: usize, episode_return: f64) -> Result<()> {
        (**self).on_episode_end(episode, episode_return)
    }

    fn on_training_end(&mut self) -> Result<()> {
        (**self).on_training_end()
    }
}
