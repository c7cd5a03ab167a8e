//! Hunter-centric state encoding

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::RelativeLocation;

/// What a hunter observes: its own displacement to the prey and its partner's.
///
/// Each hunter sees itself first, so the two hunters' states are mirror images
/// of one another and a single table layout serves both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct State {
    pub own: RelativeLocation,
    pub other: RelativeLocation,
}

impl State {
    pub const fn new(own: RelativeLocation, other: RelativeLocation) -> Self {
        Self { own, other }
    }

    /// The same situation seen from the partner's side.
    pub const fn swapped(self) -> Self {
        Self {
            own: self.other,
            other: self.own,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.own, self.other)
    }
}
