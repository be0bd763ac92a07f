//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events, allowing
//! composable data collection without coupling the training loop to specific
//! output formats or metrics.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    platformer::Outcome,
    types::{Action, StateKey},
};

/// One simulated transition as seen by the trainer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub state: StateKey,
    pub action: Action,
    pub reward: f64,
    pub next_state: StateKey,
    /// Q(s, a) after the TD update
    pub q_after: f64,
}

/// Summary of one finished training episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub epsilon: f64,
    pub steps: usize,
    pub total_reward: f64,
    /// `None` when the step budget ran out first
    pub outcome: Option<Outcome>,
    pub final_x: f64,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode, epsilon)`
///    - `on_step(episode, step, record)` - After every TD update
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` - Once at the end
///
/// Every method defaults to a no-op.
///
/// # Examples
///
/// ```no_run
/// use coin_grabber::ports::{EpisodeSummary, Observer};
///
/// struct CoinCounter {
///     coins: usize,
/// }
///
/// impl Observer for CoinCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> coin_grabber::Result<()> {
///         if summary.outcome.is_some() {
///             self.coins += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    fn on_episode_start(&mut self, _episode: usize, _epsilon: f64) -> Result<()> {
        Ok(())
    }

    /// Called after the value table has been updated for a transition.
    fn on_step(&mut self, _episode: usize, _step: usize, _record: &StepRecord) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Use this to finalize outputs, flush files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
