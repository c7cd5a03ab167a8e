//! Newtype wrappers for improved type safety and domain modeling.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of one of the two hunters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HunterId {
    First,
    Second,
}

impl HunterId {
    pub const BOTH: [HunterId; 2] = [HunterId::First, HunterId::Second];

    /// Zero-based index (0 for the first hunter).
    pub const fn index(self) -> usize {
        match self {
            HunterId::First => 0,
            HunterId::Second => 1,
        }
    }

    pub const fn partner(self) -> Self {
        match self {
            HunterId::First => HunterId::Second,
            HunterId::Second => HunterId::First,
        }
    }
}

impl fmt::Display for HunterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hunter {}", self.index() + 1)
    }
}

/// Boltzmann temperature (strictly positive, finite).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Temperature(f64);

impl Temperature {
    /// Create a temperature, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidTemperature`] if the value is not a
    /// strictly positive finite number.
    pub fn new(value: f64) -> Result<Self, crate::Error> {
        if value > 0.0 && value.is_finite() {
            Ok(Temperature(value))
        } else {
            Err(crate::Error::InvalidTemperature { value })
        }
    }

    /// Get the inner value.
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
