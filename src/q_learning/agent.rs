//! Q-learning agent
//!
//! The agent owns its value table exclusively. The trainer borrows it mutably
//! while learning; the runtime policy only ever borrows it immutably.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    discretizer::StateDiscretizer,
    q_table::{ActionValues, ValueTable},
};
use crate::{
    Error, Result,
    types::{Action, StateKey},
};

/// Hyperparameters of a [`QLearningAgent`].
///
/// `epsilon` is only the starting exploration rate; the trainer overwrites it
/// every episode. The rest stay fixed for the agent's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Exploration rate ε
    pub epsilon: f64,
    /// Learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    /// Number of horizontal buckets
    pub x_bins: usize,
    /// Width of one horizontal bucket
    pub x_bin_size: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            alpha: 0.3,
            gamma: 0.96,
            x_bins: 64,
            x_bin_size: 630.0 / 64.0,
        }
    }
}

impl AgentConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_learning_rate(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_discount(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    /// Set the bucket count and width together.
    pub fn with_bins(mut self, x_bins: usize, x_bin_size: f64) -> Self {
        self.x_bins = x_bins;
        self.x_bin_size = x_bin_size;
        self
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a rate lies outside `[0, 1]`
    /// or the bucket layout is degenerate.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("epsilon", self.epsilon),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::config(format!(
                    "agent.{name} must be within [0, 1], got {value}"
                )));
            }
        }
        StateDiscretizer::new(self.x_bins, self.x_bin_size).map(|_| ())
    }
}

/// Q-learning agent (off-policy TD control) over the discretized platformer.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    config: AgentConfig,
    discretizer: StateDiscretizer,
    table: ValueTable,
}

impl QLearningAgent {
    /// # Errors
    ///
    /// Propagates [`AgentConfig::validate`] failures.
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let discretizer = StateDiscretizer::new(config.x_bins, config.x_bin_size)?;
        let table = ValueTable::new(config.alpha, config.gamma);
        Ok(Self {
            config,
            discretizer,
            table,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn discretizer(&self) -> &StateDiscretizer {
        &self.discretizer
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn epsilon(&self) -> f64 {
        self.config.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.config.epsilon = epsilon;
    }

    pub fn state_key(&self, x: f64, is_jumping: bool) -> StateKey {
        self.discretizer.state_key(x, is_jumping)
    }

    pub fn ensure_state(&mut self, state: StateKey) {
        self.table.ensure_state(state);
    }

    /// Best action for `state`, materializing it in the table.
    pub fn best_action(&mut self, state: StateKey) -> (Action, f64) {
        self.table.best_action(state)
    }

    /// Best action for `state` without touching the table.
    pub fn greedy_action(&self, state: StateKey) -> Action {
        self.table.greedy_action(state).0
    }

    pub fn action_values(&self, state: StateKey) -> ActionValues {
        self.table.values(state)
    }

    /// ε-greedy action selection
    pub fn select_action_epsilon_greedy<R: Rng>(&mut self, state: StateKey, rng: &mut R) -> Action {
        if rng.random::<f64>() < self.config.epsilon {
            // Explore: uniform over all actions
            Action::ALL[rng.random_range(0..Action::ALL.len())]
        } else {
            // Exploit: greedy action based on Q-values
            self.best_action(state).0
        }
    }

    /// Apply the TD update for one transition, returning the new Q(s, a).
    pub fn learn(&mut self, state: StateKey, action: Action, reward: f64, next: StateKey) -> f64 {
        self.table.q_learning_update(state, action, reward, next)
    }
}
