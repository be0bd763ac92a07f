//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the training loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    sync::{Arc, Mutex},
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    platformer::Outcome,
    ports::{EpisodeSummary, Observer, StepRecord},
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    coins: usize,
    obstacles: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            coins: 0,
            obstacles: 0,
        }
    }

    fn message(&self, epsilon: f64) -> String {
        format!("coin:{} hit:{} ε={epsilon:.3}", self.coins, self.obstacles)
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

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            Some(Outcome::ReachedCoin) => self.coins += 1,
            Some(Outcome::HitObstacle) => self.obstacles += 1,
            None => {}
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message(summary.epsilon));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!("coin:{} hit:{}", self.coins, self.obstacles));
        }
        Ok(())
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub coins: usize,
    pub obstacles: usize,
    pub truncated: usize,
    pub mean_steps: f64,
    pub mean_reward: f64,
    /// Coin rate over the trailing window
    pub recent_coin_rate: f64,
    pub first_coin: Option<usize>,
    pub last_obstacle: Option<usize>,
}

/// Metrics observer - Tracks outcome counts and learning milestones
pub struct MetricsObserver {
    window: usize,
    outcomes: Vec<Option<Outcome>>,
    total_steps: usize,
    total_reward: f64,
    first_coin: Option<usize>,
    last_obstacle: Option<usize>,
}

impl MetricsObserver {
    /// Trailing window used by [`MetricsObserver::recent_coin_rate`].
    pub const DEFAULT_WINDOW: usize = 100;

    pub fn new() -> Self {
        Self::with_window(Self::DEFAULT_WINDOW)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
            outcomes: Vec::new(),
            total_steps: 0,
            total_reward: 0.0,
            first_coin: None,
            last_obstacle: None,
        }
    }

    fn count(&self, outcome: Option<Outcome>) -> usize {
        self.outcomes.iter().filter(|o| **o == outcome).count()
    }

    /// Coin rate over the last `window` episodes.
    pub fn recent_coin_rate(&self) -> f64 {
        let start = self.outcomes.len().saturating_sub(self.window);
        let recent = &self.outcomes[start..];
        if recent.is_empty() {
            return 0.0;
        }
        let coins = recent
            .iter()
            .filter(|o| **o == Some(Outcome::ReachedCoin))
            .count();
        coins as f64 / recent.len() as f64
    }

    /// First episode that ended on the coin
    pub fn first_coin(&self) -> Option<usize> {
        self.first_coin
    }

    /// Last episode that ended on the obstacle
    pub fn last_obstacle(&self) -> Option<usize> {
        self.last_obstacle
    }

    pub fn summary(&self) -> MetricsSummary {
        let n = self.outcomes.len().max(1) as f64;
        MetricsSummary {
            episodes: self.outcomes.len(),
            coins: self.count(Some(Outcome::ReachedCoin)),
            obstacles: self.count(Some(Outcome::HitObstacle)),
            truncated: self.count(None),
            mean_steps: self.total_steps as f64 / n,
            mean_reward: self.total_reward / n,
            recent_coin_rate: self.recent_coin_rate(),
            first_coin: self.first_coin,
            last_obstacle: self.last_obstacle,
        }
    }
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            Some(Outcome::ReachedCoin) if self.first_coin.is_none() => {
                self.first_coin = Some(summary.episode)
            }
            Some(Outcome::HitObstacle) => self.last_obstacle = Some(summary.episode),
            _ => {}
        }
        self.outcomes.push(summary.outcome);
        self.total_steps += summary.steps;
        self.total_reward += summary.total_reward;
        Ok(())
    }
}

/// Per-episode record written by [`JsonlObserver`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(flatten)]
    pub summary: EpisodeSummary,
    /// Transitions, present only when step recording is enabled
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transitions: Vec<StepRecord>,
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    record_steps: bool,
    current_steps: Vec<StepRecord>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create observations file {}", path.display()),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            record_steps: false,
            current_steps: Vec::new(),
        })
    }

    /// Also write every transition of each episode.
    pub fn with_steps(mut self) -> Self {
        self.record_steps = true;
        self
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, _epsilon: f64) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, _step: usize, record: &StepRecord) -> Result<()> {
        if self.record_steps {
            self.current_steps.push(*record);
        }
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let record = EpisodeRecord {
            summary: summary.clone(),
            transitions: std::mem::take(&mut self.current_steps),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Shares an observer with the caller so it can be read after training.
pub struct SharedObserver<O> {
    inner: Arc<Mutex<O>>,
}

impl<O: Observer> SharedObserver<O> {
    pub fn new(observer: O) -> Self {
        Self {
            inner: Arc::new(Mutex::new(observer)),
        }
    }

    /// Handle for reading the observer once training is done.
    pub fn handle(&self) -> Arc<Mutex<O>> {
        Arc::clone(&self.inner)
    }

    fn with<T>(&self, f: impl FnOnce(&mut O) -> Result<T>) -> Result<T> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

impl<O: Observer> Observer for SharedObserver<O> {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        self.with(|o| o.on_training_start(total_episodes))
    }

    fn on_episode_start(&mut self, episode: usize, epsilon: f64) -> Result<()> {
        self.with(|o| o.on_episode_start(episode, epsilon))
    }

    fn on_step(&mut self, episode: usize, step: usize, record: &StepRecord) -> Result<()> {
        self.with(|o| o.on_step(episode, step, record))
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.with(|o| o.on_episode_end(summary))
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.with(|o| o.on_training_end())
    }
}

#[cfg(test)]
mod tests {
    use std::io::BufRead;

    use tempfile::tempdir;

    use super::*;
    use crate::types::{Action, StateKey};

    fn summary(episode: usize, outcome: Option<Outcome>) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            epsilon: 0.5,
            steps: 10,
            total_reward: 1.0,
            outcome,
            final_x: 30.0,
        }
    }

    #[test]
    fn test_metrics_observer_milestones() {
        let mut observer = MetricsObserver::with_window(2);
        observer
            .on_episode_end(&summary(0, Some(Outcome::HitObstacle)))
            .unwrap();
        observer.on_episode_end(&summary(1, None)).unwrap();
        observer
            .on_episode_end(&summary(2, Some(Outcome::ReachedCoin)))
            .unwrap();
        observer
            .on_episode_end(&summary(3, Some(Outcome::ReachedCoin)))
            .unwrap();

        let s = observer.summary();
        assert_eq!(s.episodes, 4);
        assert_eq!((s.coins, s.obstacles, s.truncated), (2, 1, 1));
        assert_eq!(s.first_coin, Some(2));
        assert_eq!(s.last_obstacle, Some(0));
        assert_eq!(s.recent_coin_rate, 1.0);
        assert_eq!(s.mean_steps, 10.0);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_episode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("episodes.jsonl");
        let mut observer = JsonlObserver::new(&path).unwrap().with_steps();

        for episode in 0..3 {
            observer.on_episode_start(episode, 0.5).unwrap();
            let record = StepRecord {
                state: StateKey::new(0),
                action: Action::MoveRight,
                reward: 0.29,
                next_state: StateKey::new(0),
                q_after: 0.087,
            };
            observer.on_step(episode, 0, &record).unwrap();
            observer.on_episode_end(&summary(episode, None)).unwrap();
        }
        observer.on_training_end().unwrap();

        let file = File::open(&path).unwrap();
        let lines: Vec<String> = std::io::BufReader::new(file)
            .lines()
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        let parsed: serde_json::Value = serde_json::from_str(&lines[2]).unwrap();
        assert_eq!(parsed["episode"], 2);
        assert_eq!(parsed["transitions"][0]["action"], "move_right");
        assert_eq!(parsed["transitions"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_shared_observer_is_readable_afterwards() {
        let shared = SharedObserver::new(MetricsObserver::new());
        let handle = shared.handle();
        let mut boxed: Box<dyn Observer> = Box::new(shared);
        boxed
            .on_episode_end(&summary(0, Some(Outcome::ReachedCoin)))
            .unwrap();
        assert_eq!(handle.lock().unwrap().first_coin(), Some(0));
    }
}
