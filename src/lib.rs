//! Coin grabber: a tabular Q-learning agent for a small 2D platformer
//!
//! This crate provides:
//! - A deterministic one-tick platformer simulator shared by training and play
//! - State discretization and a lazily materialized Q-value table
//! - An epsilon-greedy training loop with an injectable random source
//! - A greedy runtime policy and a headless live game driven by it
//! - Observers, evaluation rollouts, and a CLI

pub mod app;
pub mod cli;
pub mod error;
pub mod pipeline;
pub mod platformer;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, Result};
pub use platformer::{LiveGame, WorldConfig};
pub use q_learning::{AgentConfig, GreedyPolicy, QLearningAgent};
pub use types::{Action, StateKey};
