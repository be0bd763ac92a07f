//! Coin grabber CLI - train a Q-learning platformer agent and watch it play
//!
//! Logging is controlled through `RUST_LOG` (default `warn`); use
//! `RUST_LOG=coin_grabber=debug` to see every episode.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "coin-grabber")]
#[command(version, about = "Tabular Q-learning for a coin-grabbing platformer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the agent in the simulator and evaluate the greedy policy
    Train(coin_grabber::cli::commands::train::TrainArgs),

    /// Train the agent, then let it drive one live game
    Play(coin_grabber::cli::commands::play::PlayArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => coin_grabber::cli::commands::train::execute(args),
        Commands::Play(args) => coin_grabber::cli::commands::play::execute(args).map(|_| ()),
    }
}
