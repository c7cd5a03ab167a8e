//! Observer pattern for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! training logic to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{Result, analysis::SeriesPoint, pipeline::EpisodeOutcome, ports::Observer};

/// Progress bar observer - Shows how many batches have been evaluated
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    batch_size: u64,
}

impl ProgressObserver {
    /// Create a new progress observer advancing by `batch_size` episodes per checkpoint
    pub fn new(batch_size: u64) -> Self {
        Self {
            progress_bar: None,
            batch_size,
        }
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: u64) -> Result<()> {
        let pb = ProgressBar::new(total_episodes);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_batch_end(&mut self, point: &SeriesPoint) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.inc(self.batch_size);
            match point.mean_length() {
                Some(mean) => pb.set_message(format!("mean length {mean:.1}")),
                None => pb.set_message("no capture"),
            }
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish();
        }
        Ok(())
    }
}

/// Metrics observer - Tracks evaluation counts over a run
#[derive(Debug, Default)]
pub struct MetricsObserver {
    batches: usize,
    captured: usize,
    abandoned: usize,
    total_steps: usize,
    last_mean_length: Option<f64>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of evaluation episodes that ended in a capture
    pub fn capture_rate(&self) -> f64 {
        let total = self.captured + self.abandoned;
        if total == 0 {
            0.0
        } else {
            self.captured as f64 / total as f64
        }
    }

    /// Average length of captured evaluation episodes
    pub fn avg_episode_length(&self) -> f64 {
        if self.captured == 0 {
            0.0
        } else {
            self.total_steps as f64 / self.captured as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            batches: self.batches,
            evaluation_episodes: self.captured + self.abandoned,
            captured: self.captured,
            abandoned: self.abandoned,
            capture_rate: self.capture_rate(),
            avg_episode_length: self.avg_episode_length(),
            last_mean_length: self.last_mean_length,
        }
    }
}

/// Summary of evaluation metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub batches: usize,
    pub evaluation_episodes: usize,
    pub captured: usize,
    pub abandoned: usize,
    pub capture_rate: f64,
    pub avg_episode_length: f64,
    pub last_mean_length: Option<f64>,
}

impl Observer for MetricsObserver {
    fn on_evaluation_episode(&mut self, length: usize, outcome: EpisodeOutcome) -> Result<()> {
        match outcome {
            EpisodeOutcome::Captured => {
                self.captured += 1;
                self.total_steps += length;
            }
            EpisodeOutcome::Abandoned => self.abandoned += 1,
        }
        Ok(())
    }

    fn on_batch_end(&mut self, point: &SeriesPoint) -> Result<()> {
        self.batches += 1;
        self.last_mean_length = point.mean_length();
        Ok(())
    }
}

/// JSONL observer - Writes every series point as one JSON line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_batch_end(&mut self, point: &SeriesPoint) -> Result<()> {
        serde_json::to_writer(&mut self.writer, point)?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
