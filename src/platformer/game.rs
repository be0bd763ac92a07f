//! Headless live game loop.
//!
//! The host owns one [`LiveGame`] and calls [`LiveGame::tick`] once per frame.
//! Drawing is left to the host; this type only tracks the live player and the
//! win/lose flags, advancing through the same [`step`] used for training.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{
    physics::{Outcome, SimState, step},
    world::WorldConfig,
};
use crate::{ports::Policy, types::Action};

/// Live game status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Running,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Running)
    }
}

impl From<Outcome> for GameStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::ReachedCoin => GameStatus::Won,
            Outcome::HitObstacle => GameStatus::Lost,
        }
    }
}

/// Live (rendered) game state driven by a [`Policy`].
#[derive(Debug, Clone)]
pub struct LiveGame {
    world: WorldConfig,
    player: SimState,
    status: GameStatus,
    ticks: usize,
    last_action: Option<Action>,
}

impl LiveGame {
    pub fn new(world: WorldConfig) -> Self {
        let player = SimState::reset(&world);
        Self {
            world,
            player,
            status: GameStatus::Running,
            ticks: 0,
            last_action: None,
        }
    }

    pub fn player(&self) -> &SimState {
        &self.player
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Ticks advanced so far (ticks after the game ended are not counted).
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn last_action(&self) -> Option<Action> {
        self.last_action
    }

    /// Advance one frame. Does nothing once the game is won or lost.
    pub fn tick<P: Policy + ?Sized>(&mut self, policy: &P) -> GameStatus {
        if self.status.is_over() {
            return self.status;
        }

        let action = policy.decide(self.player.x, self.player.is_jumping);
        let transition = step(&self.world, self.player, action);
        self.player = transition.next;
        self.ticks += 1;
        self.last_action = Some(action);

        debug!(
            tick = self.ticks,
            x = self.player.x,
            y = self.player.y,
            action = %action,
            "live tick"
        );

        if let Some(outcome) = transition.outcome {
            self.status = outcome.into();
            match self.status {
                GameStatus::Won => info!(ticks = self.ticks, "coin collected, game won"),
                GameStatus::Lost => info!(ticks = self.ticks, "hit obstacle, game lost"),
                GameStatus::Running => {}
            }
        }
        self.status
    }

    /// Tick until the game ends or `max_ticks` frames have passed.
    pub fn run<P: Policy + ?Sized>(&mut self, policy: &P, max_ticks: usize) -> GameStatus {
        while self.ticks < max_ticks && !self.status.is_over() {
            self.tick(policy);
        }
        self.status
    }
}
