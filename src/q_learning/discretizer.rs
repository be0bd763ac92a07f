//! Continuous-to-discrete state mapping.

use crate::{Error, Result, types::StateKey};

/// Maps a player position and jump flag to a [`StateKey`].
///
/// Only the horizontal bucket and the jump flag take part; vertical position
/// and velocity are not part of the key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDiscretizer {
    x_bins: usize,
    x_bin_size: f64,
}

impl StateDiscretizer {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `x_bins` is zero or
    /// `x_bin_size` is not a positive finite number.
    pub fn new(x_bins: usize, x_bin_size: f64) -> Result<Self> {
        if x_bins == 0 {
            return Err(Error::config("x_bins must be at least 1"));
        }
        if !(x_bin_size.is_finite() && x_bin_size > 0.0) {
            return Err(Error::config(format!(
                "x_bin_size must be positive and finite, got {x_bin_size}"
            )));
        }
        Ok(Self { x_bins, x_bin_size })
    }

    pub fn x_bins(&self) -> usize {
        self.x_bins
    }

    pub fn x_bin_size(&self) -> f64 {
        self.x_bin_size
    }

    /// Size of the key space, `2 * x_bins`.
    pub fn state_count(&self) -> usize {
        self.x_bins * 2
    }

    /// `clamp(floor(x / x_bin_size), 0, x_bins - 1) * 2 + jumping`.
    ///
    /// Total: out-of-range and NaN positions fall into the edge buckets.
    pub fn state_key(&self, x: f64, is_jumping: bool) -> StateKey {
        let raw = (x / self.x_bin_size).floor();
        let bucket = if raw.is_nan() || raw < 0.0 {
            0
        } else {
            // `as` saturates, so huge positions land in the last bucket.
            (raw as usize).min(self.x_bins - 1)
        };
        StateKey::new(bucket * 2 + usize::from(is_jumping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> StateDiscretizer {
        StateDiscretizer::new(64, 630.0 / 64.0).unwrap()
    }

    #[test]
    fn test_keys_in_range_and_jump_offset() {
        let d = reference();
        let mut x = 0.0;
        while x < 630.0 {
            let ground = d.state_key(x, false);
            let air = d.state_key(x, true);
            assert!(ground.value() < d.state_count());
            assert!(air.value() < d.state_count());
            assert_eq!(air.value(), ground.value() + 1);
            x += 0.7;
        }
    }

    #[test]
    fn test_bucket_boundaries() {
        let d = reference();
        assert_eq!(d.state_key(0.0, false).value(), 0);
        assert_eq!(d.state_key(9.8, false).value(), 0);
        assert_eq!(d.state_key(9.85, false).value(), 2);
        assert_eq!(d.state_key(207.0, true).value(), 43);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let d = reference();
        assert_eq!(d.state_key(-50.0, false).value(), 0);
        assert_eq!(d.state_key(f64::NAN, true).value(), 1);
        assert_eq!(d.state_key(10_000.0, false).value(), 126);
        assert_eq!(d.state_key(f64::INFINITY, true).value(), 127);
    }

    #[test]
    fn test_degenerate_configuration_rejected() {
        assert!(StateDiscretizer::new(0, 10.0).is_err());
        assert!(StateDiscretizer::new(8, 0.0).is_err());
        assert!(StateDiscretizer::new(8, -1.0).is_err());
        assert!(StateDiscretizer::new(8, f64::NAN).is_err());
    }
}
