//! Training pipeline abstractions
//!
//! This module provides composable pipelines for:
//! - Running learning agents through episodic environments
//! - Recording observations during training

pub mod observers;
pub mod training;

pub use observers::{
    EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{LearningAgent, Observer};
