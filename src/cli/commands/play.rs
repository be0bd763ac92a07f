//! Play command - Train, then let the greedy policy drive the live game

use anyhow::Result;
use clap::Parser;

use super::train::train_agent;
use crate::{
    cli::{
        config::CommonArgs,
        output::{print_kv, print_section},
    },
    platformer::{GameStatus, LiveGame},
    ports::Policy,
    q_learning::GreedyPolicy,
    types::Action,
};

/// Holds one action every frame.
struct HoldPolicy(Action);

impl Policy for HoldPolicy {
    fn decide(&self, _player_x: f64, _is_jumping: bool) -> Action {
        self.0
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train the agent, then play one live game with it")]
pub struct PlayArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Frames to play before giving up
    #[arg(long, short = 't', default_value_t = 1_000)]
    pub ticks: usize,

    /// Print the player position and action every frame
    #[arg(long, default_value_t = false)]
    pub trace: bool,

    /// Skip training and hold this action every frame (left, right, jump, idle)
    #[arg(long)]
    pub hold: Option<Action>,
}

fn play(game: &mut LiveGame, policy: &dyn Policy, ticks: usize, trace: bool) {
    while game.ticks() < ticks && !game.status().is_over() {
        game.tick(policy);
        if trace {
            let player = game.player();
            let action = game.last_action().map(|a| a.name()).unwrap_or("-");
            println!(
                "{:>5}  x={:>6.1}  y={:>6.1}  {}",
                game.ticks(),
                player.x,
                player.y,
                action
            );
        }
    }
}

/// Returns the final game status so callers (and tests) can inspect it.
pub fn execute(args: PlayArgs) -> Result<GameStatus> {
    let config = args.common.resolve()?;
    let mut game = LiveGame::new(config.world.clone());

    match args.hold {
        Some(action) => play(&mut game, &HoldPolicy(action), args.ticks, args.trace),
        None => {
            let trained = train_agent(&config, args.common.progress(), None)?;
            let policy = GreedyPolicy::new(&trained.agent);
            play(&mut game, &policy, args.ticks, args.trace);
        }
    }

    print_section("Live Game");
    let verdict = match game.status() {
        GameStatus::Won => "won (coin collected)",
        GameStatus::Lost => "lost (hit obstacle)",
        GameStatus::Running => "timed out",
    };
    print_kv("Result", verdict);
    print_kv("Frames", &game.ticks().to_string());
    print_kv("Final x", &format!("{:.1}", game.player().x));

    Ok(game.status())
}
