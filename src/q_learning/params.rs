//! Hyperparameters shared by every learner

use serde::{Deserialize, Serialize};

use super::schedule::ThetaSchedule;
use crate::{Error, Result, types::Temperature};

/// Learning hyperparameters.
///
/// # Examples
///
/// ```
/// use pursuit::q_learning::LearningParams;
///
/// let params = LearningParams::default().with_alpha(0.1).with_gamma(0.5);
/// params.validate()?;
/// # Ok::<(), pursuit::Error>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningParams {
    /// Learning rate α in `[0, 1]`
    pub alpha: f64,
    /// Discount factor γ in `[0, 1]`
    pub gamma: f64,
    /// Boltzmann temperature used until the first update
    pub initial_temperature: f64,
    /// Value of unvisited Q-table entries
    pub initial_q: f64,
    /// Base θ₀ of the decay schedule, in `(0, 1]`
    pub theta: f64,
}

impl LearningParams {
    pub const DEFAULT_THETA: f64 = 0.998849;

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_initial_temperature(mut self, temperature: f64) -> Self {
        self.initial_temperature = temperature;
        self
    }

    pub fn with_initial_q(mut self, initial_q: f64) -> Self {
        self.initial_q = initial_q;
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Check every field.
    ///
    /// # Errors
    ///
    /// Returns the first invalid parameter found.
    pub fn validate(&self) -> Result<()> {
        unit_interval("alpha", self.alpha)?;
        unit_interval("gamma", self.gamma)?;
        Temperature::new(self.initial_temperature)?;
        ThetaSchedule::new(self.theta)?;
        if !self.initial_q.is_finite() {
            return Err(Error::InvalidHyperparameter {
                name: "initial_q".to_string(),
                value: self.initial_q,
                reason: "must be finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn temperature(&self) -> Result<Temperature> {
        Temperature::new(self.initial_temperature)
    }

    pub fn schedule(&self) -> Result<ThetaSchedule> {
        ThetaSchedule::new(self.theta)
    }
}

fn unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidHyperparameter {
            name: name.to_string(),
            value,
            reason: "must lie in [0, 1]".to_string(),
        })
    }
}

impl Default for LearningParams {
    fn default() -> Self {
        Self {
            alpha: 0.3,
            gamma: 0.9,
            initial_temperature: Self::DEFAULT_THETA,
            initial_q: 0.0,
            theta: Self::DEFAULT_THETA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(LearningParams::default().validate().is_ok());
    }

    #[test]
    fn test_validate_reports_offending_field() {
        let err = LearningParams::default().with_alpha(1.5).validate().unwrap_err();
        assert!(matches!(err, Error::InvalidHyperparameter { ref name, .. } if name == "alpha"));

        let err = LearningParams::default()
            .with_initial_temperature(0.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTemperature { .. }));

        assert!(LearningParams::default().with_gamma(f64::NAN).validate().is_err());
        assert!(LearningParams::default().with_theta(-1.0).validate().is_err());
    }

    #[test]
    fn test_theta_above_one_rejected() {
        let params = LearningParams::default().with_theta(1.5);
        assert!(matches!(
            params.validate(),
            Err(Error::InvalidTheta { value }) if value == 1.5
        ));
        assert!(params.schedule().is_err());
        assert!(LearningParams::default().with_theta(1.0).validate().is_ok());
    }
}
