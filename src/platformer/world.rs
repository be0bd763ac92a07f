//! Fixed environment constants and box geometry.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Axis-aligned box in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Environment constants supplied by the host build.
///
/// Defaults are the reference build: a 630×480 screen, a 30×30 player on the
/// ground at y = 397, an obstacle at x = 250 and the coin at x = 400.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub screen_width: f64,
    pub screen_height: f64,
    pub player_width: f64,
    pub player_height: f64,
    pub ground_y: f64,
    /// Added to vertical velocity every tick
    pub gravity: f64,
    /// Vertical velocity set when a jump starts (negative is up)
    pub jump_impulse: f64,
    /// Horizontal distance covered per tick while moving
    pub step_speed: f64,
    pub coin_x: f64,
    pub coin_y: f64,
    pub obstacle_x: f64,
    pub obstacle_y: f64,
    /// Width and height of the coin and obstacle boxes
    pub item_size: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            screen_width: 630.0,
            screen_height: 480.0,
            player_width: 30.0,
            player_height: 30.0,
            ground_y: 397.0,
            gravity: 0.4,
            jump_impulse: -10.0,
            step_speed: 3.0,
            coin_x: 400.0,
            coin_y: 397.0,
            obstacle_x: 250.0,
            obstacle_y: 396.0,
            item_size: 30.0,
        }
    }
}

impl WorldConfig {
    /// Rightmost x the player may occupy.
    pub fn max_player_x(&self) -> f64 {
        self.screen_width - self.player_width
    }

    pub fn player_rect(&self, x: f64, y: f64) -> Rect {
        Rect::new(x, y, self.player_width, self.player_height)
    }

    pub fn coin_rect(&self) -> Rect {
        Rect::new(self.coin_x, self.coin_y, self.item_size, self.item_size)
    }

    pub fn obstacle_rect(&self) -> Rect {
        Rect::new(
            self.obstacle_x,
            self.obstacle_y,
            self.item_size,
            self.item_size,
        )
    }

    /// Builder-style override of the obstacle position.
    pub fn with_obstacle(mut self, x: f64, y: f64) -> Self {
        self.obstacle_x = x;
        self.obstacle_y = y;
        self
    }

    /// Builder-style override of the coin position.
    pub fn with_coin(mut self, x: f64, y: f64) -> Self {
        self.coin_x = x;
        self.coin_y = y;
        self
    }

    /// Check that the geometry can host a player at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for non-finite constants,
    /// non-positive sizes, or a player wider than the screen.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("ground_y", self.ground_y),
            ("gravity", self.gravity),
            ("jump_impulse", self.jump_impulse),
            ("step_speed", self.step_speed),
            ("coin_x", self.coin_x),
            ("coin_y", self.coin_y),
            ("obstacle_x", self.obstacle_x),
            ("obstacle_y", self.obstacle_y),
            ("item_size", self.item_size),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(Error::config(format!("world.{name} must be finite, got {value}")));
        }
        for (name, value) in [
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("item_size", self.item_size),
        ] {
            if value <= 0.0 {
                return Err(Error::config(format!(
                    "world.{name} must be positive, got {value}"
                )));
            }
        }
        if self.max_player_x() < 0.0 {
            return Err(Error::config(format!(
                "player width {} exceeds screen width {}",
                self.player_width, self.screen_width
            )));
        }
        Ok(())
    }
}
