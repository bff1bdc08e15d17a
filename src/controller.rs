use thiserror::Error;
use tracing::debug;

use crate::tasks::store::{Applied, LoadOutcome, StoreError, TaskStore};
use crate::tasks::{view, SnapshotStore, Task};

/// How prominently a notice should be displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// A user-visible message describing a command outcome.
#[derive(Debug, Clone)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }
}

/// Errors a UI command can report. All non-fatal.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The position did not map to a rendered row.
    #[error("no task selected")]
    NoSelection,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Translates UI commands into store operations and view refreshes.
///
/// Owns no task state itself — only the completed-visibility flag and
/// the last projection handed to the presentation layer, against which
/// position-based commands are resolved. Each command makes exactly one
/// store call; the caller re-queries `view` afterwards to refresh the
/// display.
///
/// Outcomes the user should see are queued as [`Notice`]s and drained
/// with [`take_notices`](Controller::take_notices) after each command.
pub struct Controller {
    store: TaskStore,
    show_completed: bool,
    last_view: Vec<Task>,
    notices: Vec<Notice>,
}

impl Controller {
    /// Open the backing snapshot and wrap the store. The load outcome is
    /// queued as the first notice: silent-ish info for a fresh start,
    /// error for an unreadable snapshot.
    pub async fn open(snapshot: SnapshotStore) -> Self {
        let (store, outcome) = TaskStore::open(snapshot).await;
        let notice = match &outcome {
            LoadOutcome::Loaded(count) => Notice::info(format!("Loaded {count} task(s)")),
            LoadOutcome::Fresh => Notice::info("No saved tasks yet — starting fresh"),
            LoadOutcome::Recovered(e) => {
                Notice::error(format!("Could not read saved tasks ({e}) — starting empty"))
            }
        };

        let mut controller = Self::new(store);
        controller.push(notice);
        controller
    }

    pub fn new(store: TaskStore) -> Self {
        Self {
            store,
            // Completed tasks are visible by default.
            show_completed: true,
            last_view: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Re-derive the projection and remember it for position lookups.
    ///
    /// Always derived from the full collection — nothing is cached
    /// between commands.
    pub fn view(&mut self) -> &[Task] {
        self.last_view = view::project(self.store.list_all(), self.show_completed);
        &self.last_view
    }

    /// Total number of tasks, ignoring the filter.
    pub fn total(&self) -> usize {
        self.store.list_all().len()
    }

    /// Number of tasks not yet completed.
    pub fn open_count(&self) -> usize {
        self.store.list_all().iter().filter(|t| !t.completed).count()
    }

    pub fn show_completed(&self) -> bool {
        self.show_completed
    }

    /// Pending notices, oldest first. Draining is the presentation
    /// layer's job after every command.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Create a task from raw input. The store trims and rejects blank
    /// text; the warning is queued here so the UI only has to render it.
    pub async fn submit_new_task(&mut self, raw: &str) -> Result<u64, CommandError> {
        match self.store.add(raw).await {
            Ok(applied) => {
                self.report_save(&applied);
                self.push(Notice::info(format!("Task {} added", applied.id)));
                Ok(applied.id)
            }
            Err(e) => {
                self.push(Notice::warning("Task text cannot be empty"));
                Err(e.into())
            }
        }
    }

    /// Delete the task at `position` in the last-rendered view.
    pub async fn delete_at(&mut self, position: Option<usize>) -> Result<u64, CommandError> {
        let id = self.id_at(position)?;
        match self.store.delete(id).await {
            Ok(applied) => {
                self.report_save(&applied);
                self.push(Notice::info(format!("Task {id} deleted")));
                Ok(id)
            }
            Err(e) => {
                self.push(Notice::warning(format!("Task {id} not found")));
                Err(e.into())
            }
        }
    }

    /// Flip completion on the task at `position` in the last-rendered view.
    pub async fn toggle_at(&mut self, position: Option<usize>) -> Result<u64, CommandError> {
        let id = self.id_at(position)?;
        match self.store.toggle(id).await {
            Ok(applied) => {
                self.report_save(&applied);
                let done = self
                    .store
                    .list_all()
                    .iter()
                    .find(|t| t.id == id)
                    .is_some_and(|t| t.completed);
                self.push(Notice::info(if done {
                    format!("Task {id} marked done")
                } else {
                    format!("Task {id} reopened")
                }));
                Ok(id)
            }
            Err(e) => {
                self.push(Notice::warning(format!("Task {id} not found")));
                Err(e.into())
            }
        }
    }

    /// Switch between showing and hiding completed tasks. Never touches
    /// the task collection itself.
    pub fn set_filter(&mut self, show_completed: bool) {
        self.show_completed = show_completed;
        debug!(show_completed, "filter changed");
        self.push(Notice::info(format!(
            "Showing completed tasks: {show_completed}"
        )));
    }

    /// Resolve a view position to a task id, against the projection the
    /// user is actually looking at.
    fn id_at(&mut self, position: Option<usize>) -> Result<u64, CommandError> {
        match position.and_then(|p| self.last_view.get(p)) {
            Some(task) => Ok(task.id),
            None => {
                self.push(Notice::warning("No task selected"));
                Err(CommandError::NoSelection)
            }
        }
    }

    fn report_save(&mut self, applied: &Applied) {
        if let Some(err) = &applied.save_error {
            self.push(Notice::error(format!(
                "Saving failed: {err} — your change is kept for this session"
            )));
        }
    }

    fn push(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_controller(dir: &TempDir) -> Controller {
        Controller::open(SnapshotStore::new(dir.path().join("tasks.json"))).await
    }

    #[tokio::test]
    async fn test_positions_map_through_the_filtered_view() {
        let dir = TempDir::new().unwrap();
        let mut c = open_controller(&dir).await;
        c.submit_new_task("one").await.unwrap();
        c.submit_new_task("two").await.unwrap();
        c.submit_new_task("three").await.unwrap();

        // Complete task 1, hide completed: position 0 now means task 2.
        c.view();
        c.toggle_at(Some(0)).await.unwrap();
        c.set_filter(false);
        c.view();

        let deleted = c.delete_at(Some(0)).await.unwrap();
        assert_eq!(deleted, 2);
    }

    #[tokio::test]
    async fn test_no_selection_when_position_is_out_of_range() {
        let dir = TempDir::new().unwrap();
        let mut c = open_controller(&dir).await;
        c.submit_new_task("only").await.unwrap();
        c.view();

        assert!(matches!(
            c.delete_at(Some(5)).await,
            Err(CommandError::NoSelection)
        ));
        assert!(matches!(
            c.toggle_at(None).await,
            Err(CommandError::NoSelection)
        ));
        // The collection was not touched.
        assert_eq!(c.total(), 1);
    }

    #[tokio::test]
    async fn test_filter_switch_never_mutates_tasks() {
        let dir = TempDir::new().unwrap();
        let mut c = open_controller(&dir).await;
        c.submit_new_task("one").await.unwrap();
        c.view();
        c.toggle_at(Some(0)).await.unwrap();

        c.set_filter(false);
        c.set_filter(true);

        assert_eq!(c.total(), 1);
        assert!(c.view()[0].completed);
    }

    #[tokio::test]
    async fn test_empty_input_queues_a_warning() {
        let dir = TempDir::new().unwrap();
        let mut c = open_controller(&dir).await;
        c.take_notices();

        assert!(c.submit_new_task("   ").await.is_err());
        let notices = c.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Warning);
    }

    #[tokio::test]
    async fn test_notices_drain_once() {
        let dir = TempDir::new().unwrap();
        let mut c = open_controller(&dir).await;
        c.submit_new_task("one").await.unwrap();

        assert!(!c.take_notices().is_empty());
        assert!(c.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_startup_notice_reports_unreadable_snapshot() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        std::fs::write(&path, "garbage").unwrap();

        let mut c = Controller::open(SnapshotStore::new(&path)).await;
        let notices = c.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].severity, Severity::Error);
    }
}
