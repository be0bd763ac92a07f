//! Training and evaluation pipeline
//!
//! This module provides:
//! - The Q-learning training loop over simulated episodes
//! - Greedy evaluation rollouts of a trained policy
//! - Observers recording progress, metrics, and episode logs

pub mod evaluation;
pub mod observers;
pub mod training;

pub use evaluation::{EvaluationResult, Evaluator, Rollout};
pub use observers::{
    EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver,
    SharedObserver,
};
pub use training::{Trainer, TrainingConfig, TrainingResult};

pub use crate::ports::{Observer, Policy};
