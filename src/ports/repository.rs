//! Repository port for experiment persistence.
//!
//! This module defines the trait boundary between the domain and infrastructure
//! layers for storing and retrieving trained experiments.

use std::path::Path;

use crate::{Result, experiment::ExperimentRecord};

/// Port for persisting and loading experiment records.
///
/// # Examples
///
/// ```no_run
/// use pursuit::ports::ExperimentRepository;
/// use pursuit::experiment::ExperimentRecord;
/// use std::path::Path;
///
/// fn archive<R: ExperimentRepository>(
///     repo: &R,
///     record: &ExperimentRecord,
///     path: &Path,
/// ) -> pursuit::Result<()> {
///     repo.save(record, path)
/// }
/// ```
pub trait ExperimentRepository {
    /// Save a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be written or
    /// serialization fails.
    fn save(&self, record: &ExperimentRecord, path: &Path) -> Result<()>;

    /// Load a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is missing, corrupted, or was written
    /// by an unsupported format version.
    fn load(&self, path: &Path) -> Result<ExperimentRecord>;
}
