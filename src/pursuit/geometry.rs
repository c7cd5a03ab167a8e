//! Toroidal grid geometry: absolute positions and hunter-to-prey displacements

use std::fmt;

use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::{Error, Result};

/// Dimensions of the wrap-around playing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    width: i32,
    height: i32,
}

impl GridSize {
    /// Create a grid size, validating both extents.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGrid`] if either dimension is below 1.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    /// Re-check the extents (deserialized values bypass [`GridSize::new`]).
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 || self.height < 1 {
            return Err(Error::InvalidGrid {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells on the grid.
    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, position: Position) -> bool {
        (0..self.width).contains(&position.x) && (0..self.height).contains(&position.y)
    }

    /// Apply an action to a position, wrapping around both edges.
    pub fn step(&self, position: Position, action: Action) -> Position {
        let (dx, dy) = action.delta();
        Position {
            x: (position.x + dx).rem_euclid(self.width),
            y: (position.y + dy).rem_euclid(self.height),
        }
    }

    /// Shortest displacement from `hunter` to `prey` on the torus.
    pub fn relative_location(&self, prey: Position, hunter: Position) -> RelativeLocation {
        RelativeLocation {
            x: toroidal_delta(prey.x - hunter.x, self.width),
            y: toroidal_delta(prey.y - hunter.y, self.height),
        }
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: 7,
            height: 7,
        }
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pick the smallest-magnitude representative of `raw` modulo `extent`.
///
/// Candidates are scanned in the order `raw`, `raw + extent`, `raw - extent`
/// and the first one with minimal absolute value wins, so on even extents the
/// tie between `+extent/2` and `-extent/2` depends on which one `raw` already is.
pub fn toroidal_delta(raw: i32, extent: i32) -> i32 {
    let mut best = raw;
    for candidate in [raw + extent, raw - extent] {
        if candidate.abs() < best.abs() {
            best = candidate;
        }
    }
    best
}

/// Absolute cell coordinates, `0 <= x < width`, `0 <= y < height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Displacement from a hunter to the prey (`prey - hunter`, shortest on the torus).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelativeLocation {
    pub x: i32,
    pub y: i32,
}

impl RelativeLocation {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by an action's raw delta without wrapping.
    ///
    /// Used by the one-step lookahead, which works purely in relative space.
    pub fn shifted(self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl From<(i32, i32)> for RelativeLocation {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for RelativeLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+})", self.x, self.y)
    }
}
