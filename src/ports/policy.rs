//! Policy port - per-tick action selection for the live game.

use crate::types::Action;

/// Decides the player's action for one live tick.
///
/// Implementations must not learn or mutate shared state: the host calls
/// `decide` every frame with the live player's position.
pub trait Policy {
    fn decide(&self, player_x: f64, is_jumping: bool) -> Action;
}

impl<P: Policy + ?Sized> Policy for &P {
    fn decide(&self, player_x: f64, is_jumping: bool) -> Action {
        (**self).decide(player_x, is_jumping)
    }
}
