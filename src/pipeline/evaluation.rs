//! Policy evaluation by rollout in the simulator

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    platformer::{Outcome, SimState, WorldConfig, step},
    ports::Policy,
};

/// One rollout from the reset state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rollout {
    pub steps: usize,
    pub total_reward: f64,
    /// `None` when the step budget ran out first
    pub outcome: Option<Outcome>,
    /// Rightmost x reached
    pub max_x: f64,
}

/// Aggregate over several rollouts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub rollouts: usize,
    pub coins: usize,
    pub obstacles: usize,
    pub timeouts: usize,
    pub coin_rate: f64,
    pub mean_steps: f64,
    pub mean_reward: f64,
    pub max_x: f64,
}

impl EvaluationResult {
    fn from_rollouts(rollouts: &[Rollout]) -> Self {
        let n = rollouts.len().max(1) as f64;
        let count = |o: Option<Outcome>| rollouts.iter().filter(|r| r.outcome == o).count();
        let coins = count(Some(Outcome::ReachedCoin));
        Self {
            rollouts: rollouts.len(),
            coins,
            obstacles: count(Some(Outcome::HitObstacle)),
            timeouts: count(None),
            coin_rate: coins as f64 / n,
            mean_steps: rollouts.iter().map(|r| r.steps as f64).sum::<f64>() / n,
            mean_reward: rollouts.iter().map(|r| r.total_reward).sum::<f64>() / n,
            max_x: rollouts.iter().map(|r| r.max_x).fold(0.0, f64::max),
        }
    }
}

/// Runs a [`Policy`] through the simulator without learning.
#[derive(Debug, Clone)]
pub struct Evaluator {
    world: WorldConfig,
}

impl Evaluator {
    pub fn new(world: WorldConfig) -> Self {
        Self { world }
    }

    /// Play one episode from the reset state.
    pub fn rollout<P: Policy + ?Sized>(&self, policy: &P, max_steps: usize) -> Rollout {
        let mut sim = SimState::reset(&self.world);
        let mut rollout = Rollout {
            steps: 0,
            total_reward: 0.0,
            outcome: None,
            max_x: sim.x,
        };

        while rollout.steps < max_steps {
            let action = policy.decide(sim.x, sim.is_jumping);
            let transition = step(&self.world, sim, action);
            sim = transition.next;
            rollout.steps += 1;
            rollout.total_reward += transition.reward;
            rollout.max_x = rollout.max_x.max(sim.x);
            if transition.done() {
                rollout.outcome = transition.outcome;
                break;
            }
        }
        rollout
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `rollouts` or `max_steps`
    /// is zero.
    pub fn evaluate<P: Policy + ?Sized>(
        &self,
        policy: &P,
        rollouts: usize,
        max_steps: usize,
    ) -> Result<EvaluationResult> {
        if rollouts == 0 || max_steps == 0 {
            return Err(Error::config(
                "evaluation needs at least one rollout and one step",
            ));
        }
        let results: Vec<Rollout> = (0..rollouts)
            .map(|_| self.rollout(policy, max_steps))
            .collect();
        Ok(EvaluationResult::from_rollouts(&results))
    }
}
