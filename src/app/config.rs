//! Application configuration file.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result, pipeline::TrainingConfig, platformer::WorldConfig, q_learning::AgentConfig,
};

/// Greedy evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    pub rollouts: usize,
    pub max_steps: usize,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            rollouts: 10,
            max_steps: 1_000,
        }
    }
}

/// Everything needed to train and play, loadable from one JSON file.
///
/// Every section and field is optional in the file; missing values take the
/// reference defaults.
///
/// # Examples
///
/// ```
/// use coin_grabber::app::AppConfig;
///
/// let config = AppConfig::from_json(r#"{ "training": { "episodes": 500 } }"#)?;
/// assert_eq!(config.training.episodes, 500);
/// assert_eq!(config.training.max_steps, 240);
/// assert_eq!(config.agent.x_bins, 64);
/// # Ok::<(), coin_grabber::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub world: WorldConfig,
    pub agent: AgentConfig,
    pub training: TrainingConfig,
    pub evaluation: EvaluationConfig,
}

impl AppConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.world.validate()?;
        self.agent.validate()?;
        self.training.validate()?;
        if self.evaluation.rollouts == 0 || self.evaluation.max_steps == 0 {
            return Err(Error::config(
                "evaluation.rollouts and evaluation.max_steps must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
