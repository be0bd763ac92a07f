//! Training loop for the Q-learning agent

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    platformer::{Outcome, SimState, WorldConfig, step},
    ports::{EpisodeSummary, Observer, StepRecord},
    q_learning::{EpsilonSchedule, QLearningAgent},
};

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of simulated episodes
    pub episodes: usize,

    /// Step budget per episode
    pub max_steps: usize,

    /// Exploration decay curve
    pub schedule: EpsilonSchedule,

    /// Random seed (None = OS entropy)
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            max_steps: 240,
            schedule: EpsilonSchedule::default(),
            seed: None,
        }
    }
}

impl TrainingConfig {
    pub fn new(episodes: usize, max_steps: usize) -> Self {
        Self {
            episodes,
            max_steps,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_schedule(mut self, schedule: EpsilonSchedule) -> Self {
        self.schedule = schedule;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an empty run or an invalid
    /// schedule.
    pub fn validate(&self) -> Result<()> {
        if self.episodes == 0 {
            return Err(Error::config("training.episodes must be at least 1"));
        }
        if self.max_steps == 0 {
            return Err(Error::config("training.max_steps must be at least 1"));
        }
        self.schedule.validate()
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub episodes: usize,
    /// Episodes that ended on the coin
    pub coins: usize,
    /// Episodes that ended on the obstacle
    pub obstacles: usize,
    /// Episodes that ran out of steps
    pub truncated: usize,
    pub coin_rate: f64,
    pub mean_reward: f64,
    pub mean_steps: f64,
    pub final_epsilon: f64,
    /// Materialized states in the value table
    pub states_visited: usize,
}

#[derive(Default)]
struct Tally {
    coins: usize,
    obstacles: usize,
    truncated: usize,
    reward: f64,
    steps: usize,
}

impl Tally {
    fn record(&mut self, summary: &EpisodeSummary) {
        match summary.outcome {
            Some(Outcome::ReachedCoin) => self.coins += 1,
            Some(Outcome::HitObstacle) => self.obstacles += 1,
            None => self.truncated += 1,
        }
        self.reward += summary.total_reward;
        self.steps += summary.steps;
    }

    fn finish(self, episodes: usize, agent: &QLearningAgent) -> TrainingResult {
        let n = episodes.max(1) as f64;
        TrainingResult {
            episodes,
            coins: self.coins,
            obstacles: self.obstacles,
            truncated: self.truncated,
            coin_rate: self.coins as f64 / n,
            mean_reward: self.reward / n,
            mean_steps: self.steps as f64 / n,
            final_epsilon: agent.epsilon(),
            states_visited: agent.table().len(),
        }
    }
}

/// Runs simulated episodes and applies the TD update after every transition.
///
/// The random source is injected so runs can be reproduced exactly.
pub struct Trainer<R: Rng = StdRng> {
    world: WorldConfig,
    config: TrainingConfig,
    rng: R,
    observers: Vec<Box<dyn Observer>>,
}

impl Trainer<StdRng> {
    /// Trainer with a `StdRng` seeded from `seed`.
    pub fn seeded(world: WorldConfig, config: TrainingConfig, seed: u64) -> Result<Self> {
        Self::new(world, config, StdRng::seed_from_u64(seed))
    }

    /// Trainer seeded from `config.seed`, or from OS entropy when unset.
    pub fn from_config(world: WorldConfig, config: TrainingConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        Self::new(world, config, rng)
    }
}

impl<R: Rng> Trainer<R> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either config is invalid.
    pub fn new(world: WorldConfig, config: TrainingConfig, rng: R) -> Result<Self> {
        world.validate()?;
        config.validate()?;
        Ok(Self {
            world,
            config,
            rng,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the trainer
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `agent` in place for the configured number of episodes.
    pub fn train(&mut self, agent: &mut QLearningAgent) -> Result<TrainingResult> {
        let episodes = self.config.episodes;
        info!(
            episodes,
            max_steps = self.config.max_steps,
            alpha = agent.config().alpha,
            gamma = agent.config().gamma,
            "training started"
        );

        for observer in &mut self.observers {
            observer.on_training_start(episodes)?;
        }

        let mut tally = Tally::default();
        for episode in 0..episodes {
            let summary = self.run_episode(agent, episode)?;
            tally.record(&summary);
            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let result = tally.finish(episodes, agent);
        info!(
            coins = result.coins,
            obstacles = result.obstacles,
            truncated = result.truncated,
            states = result.states_visited,
            "training finished"
        );
        Ok(result)
    }

    fn run_episode(&mut self, agent: &mut QLearningAgent, episode: usize) -> Result<EpisodeSummary> {
        let epsilon = self
            .config
            .schedule
            .epsilon_at(episode, self.config.episodes);
        agent.set_epsilon(epsilon);

        for observer in &mut self.observers {
            observer.on_episode_start(episode, epsilon)?;
        }

        let mut sim = SimState::reset(&self.world);
        let mut state = agent.state_key(sim.x, sim.is_jumping);
        let mut total_reward = 0.0;
        let mut steps = 0;
        let mut outcome = None;

        for step_num in 0..self.config.max_steps {
            agent.ensure_state(state);
            let action = agent.select_action_epsilon_greedy(state, &mut self.rng);
            let transition = step(&self.world, sim, action);
            let next_state = agent.state_key(transition.next.x, transition.next.is_jumping);
            let q_after = agent.learn(state, action, transition.reward, next_state);

            let record = StepRecord {
                state,
                action,
                reward: transition.reward,
                next_state,
                q_after,
            };
            for observer in &mut self.observers {
                observer.on_step(episode, step_num, &record)?;
            }

            total_reward += transition.reward;
            steps += 1;
            sim = transition.next;
            state = next_state;
            if transition.done() {
                outcome = transition.outcome;
                break;
            }
        }

        debug!(episode, epsilon, steps, total_reward, ?outcome, "episode finished");

        Ok(EpisodeSummary {
            episode,
            epsilon,
            steps,
            total_reward,
            outcome,
            final_x: sim.x,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::q_learning::AgentConfig;

    fn agent() -> QLearningAgent {
        QLearningAgent::new(AgentConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_runs_are_rejected() {
        let world = WorldConfig::default();
        assert!(Trainer::seeded(world.clone(), TrainingConfig::new(0, 240), 1).is_err());
        assert!(Trainer::seeded(world, TrainingConfig::new(10, 0), 1).is_err());
    }

    #[test]
    fn test_episode_counts_add_up() {
        let mut trainer =
            Trainer::seeded(WorldConfig::default(), TrainingConfig::new(200, 240), 5).unwrap();
        let mut agent = agent();
        let result = trainer.train(&mut agent).unwrap();

        assert_eq!(result.episodes, 200);
        assert_eq!(result.coins + result.obstacles + result.truncated, 200);
        assert!(result.mean_steps > 0.0 && result.mean_steps <= 240.0);
        assert_eq!(result.states_visited, agent.table().len());
        assert!(result.states_visited <= agent.discretizer().state_count());
    }

    #[test]
    fn test_final_epsilon_follows_schedule() {
        let config = TrainingConfig::new(40, 10);
        let expected = config.schedule.epsilon_at(39, 40);
        let mut trainer = Trainer::seeded(WorldConfig::default(), config, 9).unwrap();
        let mut agent = agent();
        let result = trainer.train(&mut agent).unwrap();
        assert!((result.final_epsilon - expected).abs() < 1e-12);
        assert!((agent.epsilon() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_single_step_episode_touches_start_state() {
        let mut trainer =
            Trainer::seeded(WorldConfig::default(), TrainingConfig::new(1, 1), 0).unwrap();
        let mut agent = agent();
        let result = trainer.train(&mut agent).unwrap();
        assert_eq!(result.truncated, 1);
        assert!(agent.table().contains(agent.state_key(0.0, false)));
    }
}
