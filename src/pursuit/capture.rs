//! Capture policies and per-hunter reward tables

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::geometry::RelativeLocation;
use crate::Error;

/// Rule deciding which hunters are credited with a capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapturePolicy {
    /// Both hunters are credited whenever they flank the prey.
    #[default]
    Homogeneous,
    /// Hunter 1 is credited whenever they flank the prey; hunter 2 only when
    /// it sits left of or below the prey.
    Heterogeneous,
}

impl CapturePolicy {
    /// Capture flags `(hunter_1, hunter_2)` for the given displacements.
    pub fn is_prey_caught(
        self,
        hunter_1: RelativeLocation,
        hunter_2: RelativeLocation,
    ) -> (bool, bool) {
        let surrounded = is_surrounded(hunter_1, hunter_2);
        match self {
            CapturePolicy::Homogeneous => (surrounded, surrounded),
            CapturePolicy::Heterogeneous => {
                let credited = hunter_2.x == 1 || hunter_2.y == -1;
                (surrounded, surrounded && credited)
            }
        }
    }

    pub const VARIANTS: &'static str = "homogeneous, heterogeneous";
}

/// True when the hunters are the two opposite orthogonal neighbours of the prey.
pub fn is_surrounded(hunter_1: RelativeLocation, hunter_2: RelativeLocation) -> bool {
    let opposite = |a: i32, b: i32| (a == -1 && b == 1) || (a == 1 && b == -1);

    let vertical = hunter_1.x == 0 && hunter_2.x == 0 && opposite(hunter_1.y, hunter_2.y);
    let horizontal = hunter_1.y == 0 && hunter_2.y == 0 && opposite(hunter_1.x, hunter_2.x);
    vertical || horizontal
}

impl FromStr for CapturePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "homogeneous" | "homo" => Ok(CapturePolicy::Homogeneous),
            "heterogeneous" | "hetero" => Ok(CapturePolicy::Heterogeneous),
            other => Err(Error::ParseCapturePolicy {
                input: other.to_string(),
                expected: Self::VARIANTS.to_string(),
            }),
        }
    }
}

impl fmt::Display for CapturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapturePolicy::Homogeneous => f.write_str("homogeneous"),
            CapturePolicy::Heterogeneous => f.write_str("heterogeneous"),
        }
    }
}

/// Reward on capture and penalty otherwise, configured per hunter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HunterReward {
    pub reward: f64,
    pub penalty: f64,
}

impl HunterReward {
    pub const fn new(reward: f64, penalty: f64) -> Self {
        Self { reward, penalty }
    }

    pub fn score(&self, captured: bool) -> f64 {
        if captured { self.reward } else { self.penalty }
    }
}

impl Default for HunterReward {
    fn default() -> Self {
        Self::new(1.0, 0.0)
    }
}
