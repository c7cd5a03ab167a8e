//! Exponentially decaying theta schedule

use serde::{Deserialize, Serialize};

use crate::{Error, Result, types::Temperature};

/// `θ(episode) = 0.2 · θ₀^episode`
///
/// The same value drives the internal-model update rate and the live
/// Boltzmann temperature, so exploration cools as partner estimates firm up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThetaSchedule {
    initial_theta: f64,
}

impl ThetaSchedule {
    /// Scale applied to every term of the schedule.
    pub const SCALE: f64 = 0.2;

    /// # Errors
    ///
    /// Returns [`Error::InvalidTheta`] unless `initial_theta` lies in `(0, 1]`.
    /// Larger values would grow the update rate past one and push partner
    /// estimates out of `[0, 1]`.
    pub fn new(initial_theta: f64) -> Result<Self> {
        if initial_theta > 0.0 && initial_theta <= 1.0 {
            Ok(Self { initial_theta })
        } else {
            Err(Error::InvalidTheta {
                value: initial_theta,
            })
        }
    }

    pub fn initial_theta(&self) -> f64 {
        self.initial_theta
    }

    pub fn theta(&self, episode: u64) -> f64 {
        Self::SCALE * self.initial_theta.powf(episode as f64)
    }

    /// The schedule value as a Boltzmann temperature.
    ///
    /// # Errors
    ///
    /// Fails once the schedule has decayed to zero. With the default
    /// `θ₀ = 0.998849` that takes roughly 650 000 episodes; subnormal values
    /// before that point are still accepted and selection falls back to a
    /// greedy choice.
    pub fn temperature(&self, episode: u64) -> Result<Temperature> {
        Temperature::new(self.theta(episode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_starts_at_scale() {
        let schedule = ThetaSchedule::new(0.998849).unwrap();
        assert_eq!(schedule.theta(0), 0.2);
        assert!((schedule.theta(1) - 0.2 * 0.998849).abs() < 1e-15);
    }

    #[test]
    fn test_schedule_decays_monotonically() {
        let schedule = ThetaSchedule::new(0.998849).unwrap();
        let mut previous = schedule.theta(0);
        for episode in [1, 10, 100, 1000, 2000] {
            let current = schedule.theta(episode);
            assert!(current < previous);
            previous = current;
        }
        assert!(schedule.temperature(2000).is_ok());
    }

    #[test]
    fn test_rejects_invalid_theta() {
        assert!(matches!(
            ThetaSchedule::new(0.0),
            Err(Error::InvalidTheta { .. })
        ));
        assert!(ThetaSchedule::new(f64::NAN).is_err());
        assert!(matches!(
            ThetaSchedule::new(1.5),
            Err(Error::InvalidTheta { value }) if value == 1.5
        ));
        assert!(ThetaSchedule::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_unit_theta_keeps_rate_constant() {
        let schedule = ThetaSchedule::new(1.0).unwrap();
        assert_eq!(schedule.theta(0), 0.2);
        assert_eq!(schedule.theta(5_000), 0.2);
    }
}
