//! Pursuit game: two hunters cornering a prey on a wrap-around grid
//!
//! This module provides:
//! - Grid geometry with toroidal shortest displacements
//! - The five-action move set and joint action pairs
//! - Hunter-centric relative state encoding
//! - Pluggable capture policies with per-hunter rewards
//! - The environment driving prey and hunter movement

pub mod action;
pub mod capture;
pub mod game;
pub mod geometry;
pub mod state;

pub use action::{Action, JointAction};
pub use capture::{CapturePolicy, HunterReward, is_surrounded};
pub use game::{Game, GameConfig, StepOutcome};
pub use geometry::{GridSize, Position, RelativeLocation, toroidal_delta};
pub use state::State;
