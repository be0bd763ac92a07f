//! Platformer environment
//!
//! A single player walks and jumps along the ground toward a coin while an
//! obstacle sits in the way. Both the training simulator and the live game
//! advance through [`step`], so the agent trains on exactly the dynamics it
//! later plays under.

pub mod game;
pub mod physics;
pub mod world;

pub use game::{GameStatus, LiveGame};
pub use physics::{Outcome, SimState, Transition, apply_action, step};
pub use world::{Rect, WorldConfig};
