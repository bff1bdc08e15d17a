use thiserror::Error;
use tracing::{debug, info, warn};

use super::snapshot::{SnapshotError, SnapshotStore};
use super::Task;

/// Errors a store mutation can report. Both are non-fatal: the caller
/// surfaces them to the user and carries on.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Task text was empty after trimming.
    #[error("task text cannot be empty")]
    InvalidInput,
    /// No task with the given id exists.
    #[error("task {0} not found")]
    NotFound(u64),
}

/// How the store came up at startup.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Snapshot read successfully; holds the number of tasks loaded.
    Loaded(usize),
    /// No snapshot existed yet; starting with an empty list.
    Fresh,
    /// The snapshot was unreadable; starting empty. The file on disk is
    /// left as-is until the next successful save replaces it.
    Recovered(SnapshotError),
}

/// Outcome of a successful mutation.
///
/// `save_error` is set when the snapshot write failed. The in-memory
/// change is kept either way — the user's edit survives the session and
/// the next mutation's save is the only retry.
#[derive(Debug)]
pub struct Applied {
    pub id: u64,
    pub save_error: Option<SnapshotError>,
}

/// Single source of truth for the task collection.
///
/// Owns the tasks exclusively, hands out monotonically increasing ids
/// that are never reused within a session, and rewrites the full
/// snapshot after every successful mutation.
pub struct TaskStore {
    /// Kept in ascending id order; appends preserve it since new ids are
    /// always the largest.
    tasks: Vec<Task>,
    next_id: u64,
    snapshot: SnapshotStore,
}

impl TaskStore {
    /// Load the store from its snapshot.
    ///
    /// Never fails: an absent snapshot means a fresh list, and a
    /// malformed one degrades to a fresh list with the failure reported
    /// in the outcome for the caller to surface.
    pub async fn open(snapshot: SnapshotStore) -> (Self, LoadOutcome) {
        let (mut tasks, outcome) = match snapshot.load().await {
            Ok(Some(tasks)) => {
                let count = tasks.len();
                (tasks, LoadOutcome::Loaded(count))
            }
            Ok(None) => (Vec::new(), LoadOutcome::Fresh),
            Err(e) => {
                warn!(path = %snapshot.path().display(), err = %e, "unreadable task snapshot — starting empty");
                (Vec::new(), LoadOutcome::Recovered(e))
            }
        };

        tasks.sort_by_key(|t| t.id);
        let next_id = tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1);

        debug!(count = tasks.len(), next_id, "task store opened");
        (
            Self {
                tasks,
                next_id,
                snapshot,
            },
            outcome,
        )
    }

    /// All tasks in ascending id order — stable and deterministic even
    /// after deletes leave gaps in the id sequence.
    pub fn list_all(&self) -> &[Task] {
        &self.tasks
    }

    /// Append a new task under the next id. Fails when the trimmed text
    /// is empty; nothing is stored or written in that case.
    pub async fn add(&mut self, text: &str) -> Result<Applied, StoreError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidInput);
        }

        let id = self.next_id;
        self.tasks.push(Task {
            id,
            text: text.to_string(),
            completed: false,
        });
        self.next_id += 1;

        info!(id, "task added");
        Ok(self.persist(id).await)
    }

    /// Remove the task with the given id. A miss leaves the collection
    /// and `next_id` unchanged and triggers no snapshot write.
    pub async fn delete(&mut self, id: u64) -> Result<Applied, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Err(StoreError::NotFound(id));
        }

        info!(id, "task deleted");
        Ok(self.persist(id).await)
    }

    /// Flip completion on the task with the given id. No write on a miss.
    pub async fn toggle(&mut self, id: u64) -> Result<Applied, StoreError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StoreError::NotFound(id))?;
        task.completed = !task.completed;

        info!(id, completed = task.completed, "task toggled");
        Ok(self.persist(id).await)
    }

    /// Rewrite the full snapshot after a mutation. A failed write keeps
    /// the in-memory state authoritative and hands the error back to the
    /// caller; there is no automatic retry.
    async fn persist(&self, id: u64) -> Applied {
        match self.snapshot.save(&self.tasks).await {
            Ok(()) => Applied {
                id,
                save_error: None,
            },
            Err(e) => {
                warn!(id, err = %e, "snapshot save failed — keeping in-memory state");
                Applied {
                    id,
                    save_error: Some(e),
                }
            }
        }
    }
}
