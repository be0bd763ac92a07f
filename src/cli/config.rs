//! Shared configuration arguments for CLI commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::app::AppConfig;

/// Options common to every command that trains an agent
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// JSON config file (world, agent, training, evaluation sections)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of training episodes (overrides the config file)
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Step budget per training episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the training progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl CommonArgs {
    /// Load the config file (or defaults) and apply command-line overrides.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => AppConfig::default(),
        };
        if let Some(episodes) = self.episodes {
            config.training.episodes = episodes;
        }
        if let Some(max_steps) = self.max_steps {
            config.training.max_steps = max_steps;
        }
        if let Some(seed) = self.seed {
            config.training.seed = Some(seed);
        }
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub fn progress(&self) -> bool {
        !self.no_progress
    }
}
