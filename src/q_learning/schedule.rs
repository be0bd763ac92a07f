//! Exploration-rate schedule for training.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Exponentially decaying epsilon:
///
/// `epsilon(ep) = floor + span * exp(-ep / (episodes * decay_fraction))`
///
/// With the defaults this is `0.2 + 0.8 * exp(-ep / (episodes / 4))`, using
/// real division.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpsilonSchedule {
    /// Exploration rate approached late in training
    pub floor: f64,
    /// Extra exploration at episode 0
    pub span: f64,
    /// Fraction of the run over which the extra exploration decays by 1/e
    pub decay_fraction: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            floor: 0.2,
            span: 0.8,
            decay_fraction: 0.25,
        }
    }
}

impl EpsilonSchedule {
    /// Exploration rate for episode `episode` of `total_episodes`.
    pub fn epsilon_at(&self, episode: usize, total_episodes: usize) -> f64 {
        let time_constant = total_episodes as f64 * self.decay_fraction;
        self.floor + self.span * (-(episode as f64) / time_constant).exp()
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] unless `floor` and
    /// `floor + span` lie in `[0, 1]`, `span >= 0` and `decay_fraction > 0`.
    pub fn validate(&self) -> Result<()> {
        let peak = self.floor + self.span;
        if !(0.0..=1.0).contains(&self.floor) || !(0.0..=1.0).contains(&peak) || self.span < 0.0
        {
            return Err(Error::config(format!(
                "epsilon schedule must stay within [0, 1] (floor {}, span {})",
                self.floor, self.span
            )));
        }
        if !(self.decay_fraction.is_finite() && self.decay_fraction > 0.0) {
            return Err(Error::config(format!(
                "epsilon decay_fraction must be positive, got {}",
                self.decay_fraction
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_curve() {
        let schedule = EpsilonSchedule::default();
        assert!((schedule.epsilon_at(0, 10_000) - 1.0).abs() < 1e-12);
        let quarter = schedule.epsilon_at(2_500, 10_000);
        assert!((quarter - (0.2 + 0.8 * (-1.0f64).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_monotonically_non_increasing() {
        let schedule = EpsilonSchedule::default();
        for total in [1, 3, 7, 100, 5_000] {
            let mut previous = f64::INFINITY;
            for ep in 0..total {
                let eps = schedule.epsilon_at(ep, total);
                assert!(eps <= previous, "epsilon rose at ep {ep} of {total}");
                assert!((0.2..=1.0).contains(&eps));
                previous = eps;
            }
        }
    }

    #[test]
    fn test_small_runs_use_real_division() {
        // episodes / 4 would truncate to 0 under integer division
        let eps = EpsilonSchedule::default().epsilon_at(1, 3);
        assert!(eps.is_finite());
        assert!((eps - (0.2 + 0.8 * (-4.0f64 / 3.0).exp())).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        assert!(EpsilonSchedule::default().validate().is_ok());
        let too_high = EpsilonSchedule {
            floor: 0.5,
            span: 0.8,
            ..EpsilonSchedule::default()
        };
        assert!(too_high.validate().is_err());
        let no_decay = EpsilonSchedule {
            decay_fraction: 0.0,
            ..EpsilonSchedule::default()
        };
        assert!(no_decay.validate().is_err());
    }
}
