use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tracing::debug;

use super::Task;

/// Errors the snapshot layer can report.
///
/// Absence of the backing file is NOT an error — `load` returns
/// `Ok(None)` so a first run starts with an empty list without noise.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The file exists but does not parse as a task array.
    #[error("snapshot at {path} is not a valid task list: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The task list could not be serialized.
    #[error("could not encode task list: {0}")]
    Encode(#[source] serde_json::Error),
    /// Reading or writing the backing file failed.
    #[error("snapshot I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loads and saves the full task set as one JSON document.
///
/// Every save is a full snapshot of the collection, written atomically:
/// tmp file → rename to prevent partial reads.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted task set. `Ok(None)` when no snapshot exists yet.
    ///
    /// A malformed file is reported as `Malformed` and left untouched on
    /// disk — it is only replaced by the next successful `save`.
    pub async fn load(&self) -> Result<Option<Vec<Task>>, SnapshotError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_err(e)),
        };

        let tasks: Vec<Task> = serde_json::from_str(&contents).map_err(|e| {
            SnapshotError::Malformed {
                path: self.path.clone(),
                source: e,
            }
        })?;

        debug!(path = %self.path.display(), count = tasks.len(), "snapshot loaded");
        Ok(Some(tasks))
    }

    /// Overwrite the snapshot with the full collection in one operation.
    pub async fn save(&self, tasks: &[Task]) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(tasks).map_err(SnapshotError::Encode)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| self.io_err(e))?;
        }

        // Atomic write: write to tmp, then rename
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await.map_err(|e| self.io_err(e))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| self.io_err(e))?;

        debug!(path = %self.path.display(), count = tasks.len(), "snapshot saved");
        Ok(())
    }

    fn io_err(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
