//! Training and evaluation pipeline
//!
//! This module provides:
//! - The training loop alternating learning batches and frozen evaluations
//! - Observers recording progress and learning curves during training

pub mod observers;
pub mod training;

pub use observers::{JsonlObserver, MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{EpisodeOutcome, EpisodeReport, TrainingLoop, TrainingResult};

pub use crate::ports::Observer;
