//! Greedy runtime policy derived from a trained agent.

use crate::{ports::Policy, q_learning::QLearningAgent, types::Action};

/// Always picks the highest-valued action. No exploration, no learning.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPolicy<'a> {
    agent: &'a QLearningAgent,
}

impl<'a> GreedyPolicy<'a> {
    pub fn new(agent: &'a QLearningAgent) -> Self {
        Self { agent }
    }
}

impl Policy for GreedyPolicy<'_> {
    fn decide(&self, player_x: f64, is_jumping: bool) -> Action {
        let state = self.agent.state_key(player_x, is_jumping);
        self.agent.greedy_action(state)
    }
}
