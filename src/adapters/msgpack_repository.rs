//! MessagePack implementation of the experiment repository.
//!
//! This adapter implements the ExperimentRepository port using rmp_serde for
//! compact binary serialization.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{Result, error::Error, experiment::ExperimentRecord, ports::ExperimentRepository};

/// MessagePack-based experiment repository.
///
/// # Examples
///
/// ```no_run
/// use pursuit::adapters::MsgPackRepository;
/// use pursuit::ports::ExperimentRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository::new();
/// let record = repo.load(Path::new("cooperative.msgpack"))?;
/// repo.save(&record, Path::new("copy.msgpack"))?;
/// # Ok::<(), pursuit::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    /// Create a new MessagePack repository.
    pub fn new() -> Self {
        Self
    }
}

impl ExperimentRepository for MsgPackRepository {
    fn save(&self, record: &ExperimentRecord, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, record).map_err(|e| {
            Error::SerializationContext {
                operation: "serialize experiment to MessagePack".to_string(),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        Ok(())
    }

    fn load(&self, path: &Path) -> Result<ExperimentRecord> {
        if !path.exists() {
            return Err(Error::RecordNotFound {
                path: path.display().to_string(),
            });
        }

        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        let record: ExperimentRecord = rmp_serde::decode::from_read(BufReader::new(file))
            .map_err(|e| Error::SerializationContext {
                operation: "deserialize experiment from MessagePack".to_string(),
                message: e.to_string(),
            })?;

        record.check_version()?;
        Ok(record)
    }
}
