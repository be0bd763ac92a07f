//! CLI infrastructure for the coin grabber
//!
//! This module provides the command-line interface for training the agent
//! and watching the trained policy play the live game.

pub mod commands;
pub mod config;
pub mod output;
