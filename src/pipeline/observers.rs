//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result, ports::Observer};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    total_return: f64,
    episodes: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            total_return: 0.0,
            episodes: 0,
        }
    }

    fn message(&self) -> String {
        let average = if self.episodes == 0 {
            0.0
        } else {
            self.total_return / self.episodes as f64
        };
        format!("avg return {average:.3}")
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, episode_return: f64) -> Result<()> {
        self.episodes += 1;
        self.total_return += episode_return;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks per-episode returns and lengths
pub struct MetricsObserver {
    returns: Vec<f64>,
    lengths: Vec<usize>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self {
            returns: Vec::new(),
            lengths: Vec::new(),
        }
    }

    pub fn returns(&self) -> &[f64] {
        &self.returns
    }

    /// Mean return of the last `window` completed episodes
    pub fn moving_average(&self, window: usize) -> f64 {
        let start = self.returns.len().saturating_sub(window);
        let recent = &self.returns[start..];
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().sum::<f64>() / recent.len() as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        let episodes = self.returns.len();
        let total_steps = self.lengths.iter().sum::<usize>();
        MetricsSummary {
            episodes,
            total_steps,
            average_return: self.moving_average(episodes),
            best_return: self.returns.iter().copied().reduce(f64::max),
            worst_return: self.returns.iter().copied().reduce(f64::min),
            avg_episode_length: if episodes == 0 {
                0.0
            } else {
                total_steps as f64 / episodes as f64
            },
        }
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub total_steps: usize,
    pub average_return: f64,
    pub best_return: Option<f64>,
    pub worst_return: Option<f64>,
    pub avg_episode_length: f64,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.lengths.push(0);
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, _reward: f64) -> Result<()> {
        if let Some(last) = self.lengths.last_mut() {
            *last += 1;
        }
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, episode_return: f64) -> Result<()> {
        self.returns.push(episode_return);
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        let summary = self.summary();
        info!(
            episodes = summary.episodes,
            average_return = summary.average_return,
            avg_episode_length = summary.avg_episode_length,
            "training metrics"
        );
        Ok(())
    }
}

/// One line of a JSONL trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub steps: usize,
    pub rewards: Vec<f64>,
    pub episode_return: f64,
}

/// JSONL observer - Exports one [`EpisodeRecord`] per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    rewards: Vec<f64>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            rewards: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        self.rewards.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, reward: f64) -> Result<()> {
        self.rewards.push(reward);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, episode_return: f64) -> Result<()> {
        let record = EpisodeRecord {
            episode,
            steps: self.rewards.len(),
            rewards: std::mem::take(&mut self.rewards),
            episode_return,
        };

        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(observer: &mut dyn Observer, episodes: &[&[f64]]) {
        observer.on_training_start(episodes.len()).unwrap();
        for (episode, rewards) in episodes.iter().enumerate() {
            observer.on_episode_start(episode).unwrap();
            for (step, reward) in rewards.iter().enumerate() {
                observer.on_step(episode, step, *reward).unwrap();
            }
            observer
                .on_episode_end(episode, rewards.iter().sum())
                .unwrap();
        }
        observer.on_training_end().unwrap();
    }

    #[test]
    fn metrics_summarise_episodes() {
        let mut metrics = MetricsObserver::new();
        feed(&mut metrics, &[&[0.0, 1.0], &[-1.0], &[0.0, 0.0, 3.0]]);

        let summary = metrics.summary();
        assert_eq!(summary.episodes, 3);
        assert_eq!(summary.total_steps, 6);
        assert_eq!(summary.best_return, Some(3.0));
        assert_eq!(summary.worst_return, Some(-1.0));
        assert_eq!(summary.average_return, 1.0);
        assert_eq!(summary.avg_episode_length, 2.0);
        assert_eq!(metrics.moving_average(2), 1.0);
    }

    #[test]
    fn empty_metrics() {
        let summary = MetricsObserver::new().summary();
        assert_eq!(summary.episodes, 0);
        assert_eq!(summary.best_return, None);
        assert_eq!(summary.average_return, 0.0);
    }

    #[test]
    fn jsonl_writes_one_record_per_episode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.jsonl");
        let mut observer = JsonlObserver::new(&path).unwrap();
        feed(&mut observer, &[&[0.0, 1.0], &[-1.0]]);
        drop(observer);

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<EpisodeRecord> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rewards, vec![0.0, 1.0]);
        assert_eq!(records[1].episode, 1);
        assert_eq!(records[1].episode_return, -1.0);
    }
}
