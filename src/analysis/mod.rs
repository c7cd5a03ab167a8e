//! Analysis tools for pursuit experiments
//!
//! Episode-length statistics and the learning curves built from them.

pub mod stats;

pub use stats::{EpisodeStats, LearningCurve, SeriesPoint};
