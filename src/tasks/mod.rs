pub mod snapshot;
pub mod store;
pub mod view;

pub use snapshot::SnapshotStore;
pub use store::TaskStore;

use serde::{Deserialize, Serialize};

/// A single to-do item.
///
/// `id` is assigned by the store, is unique within it, and is never
/// reused in a session — not even after the task is deleted. `text` is
/// immutable once created; `completed` is the only field that changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
}
