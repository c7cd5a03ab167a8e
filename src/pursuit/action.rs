//! Hunter actions and joint action pairs

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single move available to a hunter (and, minus `Stay`, to the prey).
///
/// Coordinates are counted from the top-left cell, so `Up` decreases `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
    Stay,
}

impl Action {
    /// Number of actions in the fixed action set.
    pub const COUNT: usize = 5;

    /// Every action in canonical enumeration order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::Up,
        Action::Right,
        Action::Down,
        Action::Left,
        Action::Stay,
    ];

    /// The prey's move set: the four cardinal directions, no `Stay`.
    pub const CARDINAL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Coordinate delta `(dx, dy)` applied by this action.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Right => (1, 0),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Stay => (0, 0),
        }
    }

    /// Position of this action in [`Action::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Right => "right",
            Action::Down => "down",
            Action::Left => "left",
            Action::Stay => "stay",
        };
        f.write_str(name)
    }
}

/// Actions chosen for both hunters in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointAction {
    pub first: Action,
    pub second: Action,
}

impl JointAction {
    /// Number of joint actions (5 × 5).
    pub const COUNT: usize = Action::COUNT * Action::COUNT;

    pub const fn new(first: Action, second: Action) -> Self {
        Self { first, second }
    }

    /// All 25 pairs, first hunter's action in the outer loop.
    pub fn all() -> impl Iterator<Item = JointAction> {
        Action::ALL
            .into_iter()
            .flat_map(|first| Action::ALL.into_iter().map(move |second| Self::new(first, second)))
    }
}

impl fmt::Display for JointAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
