//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training events,
//! allowing composable data collection without coupling the training
//! loop to specific output formats or metrics.

use crate::{Result, analysis::SeriesPoint, pipeline::EpisodeOutcome};

/// Observer trait for monitoring training
///
/// Observers can be composed to collect different types of data during training.
/// Examples include:
/// - Progress bars for user feedback
/// - JSONL export of the learning curve
/// - Aggregate counters for summaries
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - Once at the beginning
/// 2. For each batch:
///    - `on_evaluation_episode(...)` - For each frozen evaluation episode
///    - `on_batch_end(point)` - Once the checkpoint is summarized
/// 3. `on_training_end()` - Once at the end
///
/// # Examples
///
/// ```no_run
/// use pursuit::{analysis::SeriesPoint, ports::Observer};
///
/// struct CheckpointCounter {
///     checkpoints: usize,
/// }
///
/// impl Observer for CheckpointCounter {
///     fn on_batch_end(&mut self, _point: &SeriesPoint) -> pursuit::Result<()> {
///         self.checkpoints += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    ///
    /// # Parameters
    ///
    /// * `total_episodes` - Learning episodes the run will play
    fn on_training_start(&mut self, _total_episodes: u64) -> Result<()> {
        Ok(())
    }

    /// Called after each frozen evaluation episode.
    ///
    /// # Parameters
    ///
    /// * `length` - Steps played
    /// * `outcome` - Whether the prey was captured or the episode abandoned
    fn on_evaluation_episode(&mut self, _length: usize, _outcome: EpisodeOutcome) -> Result<()> {
        Ok(())
    }

    /// Called when a batch of learning episodes has been evaluated.
    fn on_batch_end(&mut self, _point: &SeriesPoint) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    ///
    /// Use this to finalize outputs, close files, or display summaries.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
