//! One-tick platformer physics shared by training and the live game.

use serde::{Deserialize, Serialize};

use super::world::WorldConfig;
use crate::types::Action;

/// Progress reward is the change in coin distance divided by this.
const PROGRESS_SCALE: f64 = 10.0;
/// Constant cost charged on every tick.
const STEP_COST: f64 = 0.01;
/// Bonus for the coin, penalty for the obstacle.
const TERMINAL_REWARD: f64 = 100.0;

/// Continuous physical state of the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimState {
    pub x: f64,
    pub y: f64,
    pub vertical_velocity: f64,
    pub is_jumping: bool,
}

impl SimState {
    /// Episode start: left edge, standing on the ground.
    pub fn reset(world: &WorldConfig) -> Self {
        Self {
            x: 0.0,
            y: world.ground_y,
            vertical_velocity: 0.0,
            is_jumping: false,
        }
    }
}

/// How a terminal transition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    ReachedCoin,
    HitObstacle,
}

/// Result of advancing the simulator by one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub next: SimState,
    pub reward: f64,
    /// Set when the tick ended the episode
    pub outcome: Option<Outcome>,
}

impl Transition {
    pub fn done(&self) -> bool {
        self.outcome.is_some()
    }
}

/// Resolve an action into the horizontal speed for this tick.
///
/// A jump only starts from the ground; mid-air it leaves vertical motion
/// alone. Horizontal speed is zero for both `Jump` and `Idle`.
pub fn apply_action(world: &WorldConfig, state: &mut SimState, action: Action) -> f64 {
    match action {
        Action::MoveLeft => -world.step_speed,
        Action::MoveRight => world.step_speed,
        Action::Jump => {
            if !state.is_jumping {
                state.vertical_velocity = world.jump_impulse;
                state.is_jumping = true;
            }
            0.0
        }
        Action::Idle => 0.0,
    }
}

/// Advance `state` by one tick under `action`.
///
/// The obstacle is checked before the coin, so a tick touching both is a loss.
pub fn step(world: &WorldConfig, state: SimState, action: Action) -> Transition {
    let mut next = state;
    let speed = apply_action(world, &mut next, action);

    let old_distance = (next.x - world.coin_x).abs();

    next.x += speed;
    next.vertical_velocity += world.gravity;
    next.y += next.vertical_velocity;

    if next.y >= world.ground_y {
        next.y = world.ground_y;
        next.vertical_velocity = 0.0;
        next.is_jumping = false;
    }
    next.x = next.x.clamp(0.0, world.max_player_x());

    let new_distance = (next.x - world.coin_x).abs();
    let mut reward = (old_distance - new_distance) / PROGRESS_SCALE - STEP_COST;

    let player = world.player_rect(next.x, next.y);
    let outcome = if player.overlaps(&world.obstacle_rect()) {
        reward -= TERMINAL_REWARD;
        Some(Outcome::HitObstacle)
    } else if player.overlaps(&world.coin_rect()) {
        reward += TERMINAL_REWARD;
        Some(Outcome::ReachedCoin)
    } else {
        None
    };

    Transition {
        next,
        reward,
        outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> WorldConfig {
        WorldConfig::default()
    }

    #[test]
    fn test_idle_on_ground_costs_one_step() {
        let world = world();
        let t = step(&world, SimState::reset(&world), Action::Idle);
        assert_eq!(t.next, SimState::reset(&world));
        assert!((t.reward + 0.01).abs() < 1e-12);
        assert!(!t.done());
    }

    #[test]
    fn test_jump_from_ground() {
        let world = world();
        let t = step(&world, SimState::reset(&world), Action::Jump);
        assert!(t.next.is_jumping);
        assert!((t.next.vertical_velocity - (-9.6)).abs() < 1e-9);
        assert!((t.next.y - 387.4).abs() < 1e-9);
        assert_eq!(t.next.x, 0.0);
    }

    #[test]
    fn test_jump_mid_air_does_not_restart() {
        let world = world();
        let airborne = step(&world, SimState::reset(&world), Action::Jump).next;
        let t = step(&world, airborne, Action::Jump);
        assert!((t.next.vertical_velocity - (-9.2)).abs() < 1e-9);
        assert!(t.next.is_jumping);
    }

    #[test]
    fn test_jump_zeroes_horizontal_speed_in_air() {
        let world = world();
        let airborne = step(&world, SimState::reset(&world), Action::Jump).next;
        let moved = step(&world, airborne, Action::MoveRight).next;
        let t = step(&world, moved, Action::Jump);
        assert_eq!(t.next.x, moved.x);
    }

    #[test]
    fn test_jump_lands_back_on_ground() {
        let world = world();
        let mut state = step(&world, SimState::reset(&world), Action::Jump).next;
        let mut ticks = 1;
        while state.is_jumping {
            state = step(&world, state, Action::Idle).next;
            ticks += 1;
            assert!(ticks < 100, "jump never landed");
        }
        assert_eq!(state.y, world.ground_y);
        assert_eq!(state.vertical_velocity, 0.0);
    }

    #[test]
    fn test_left_edge_clamp() {
        let world = world();
        let t = step(&world, SimState::reset(&world), Action::MoveLeft);
        assert_eq!(t.next.x, 0.0);
        assert!((t.reward + 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_right_edge_clamp() {
        let world = world().with_coin(0.0, 0.0).with_obstacle(0.0, 0.0);
        let start = SimState {
            x: 599.0,
            ..SimState::reset(&world)
        };
        let t = step(&world, start, Action::MoveRight);
        assert_eq!(t.next.x, 600.0);
    }

    #[test]
    fn test_reward_sign_follows_progress() {
        let world = world();
        let start = SimState {
            x: 100.0,
            ..SimState::reset(&world)
        };
        let closer = step(&world, start, Action::MoveRight);
        let farther = step(&world, start, Action::MoveLeft);
        assert!(closer.reward > -0.01);
        assert!(farther.reward < -0.01);
        assert!((closer.reward - 0.29).abs() < 1e-9);
    }

    #[test]
    fn test_walking_right_hits_obstacle_first() {
        let world = world();
        let mut state = SimState::reset(&world);
        for tick in 1..=200 {
            let t = step(&world, state, Action::MoveRight);
            state = t.next;
            if t.done() {
                assert_eq!(t.outcome, Some(Outcome::HitObstacle));
                assert_eq!(tick, 74);
                assert_eq!(state.x, 222.0);
                assert!((t.reward - (0.29 - 100.0)).abs() < 1e-9);
                return;
            }
        }
        panic!("episode never terminated");
    }

    #[test]
    fn test_obstacle_wins_over_coin() {
        let world = world().with_obstacle(400.0, 396.0);
        let start = SimState {
            x: 369.0,
            ..SimState::reset(&world)
        };
        let t = step(&world, start, Action::MoveRight);
        assert_eq!(t.outcome, Some(Outcome::HitObstacle));
    }
}
