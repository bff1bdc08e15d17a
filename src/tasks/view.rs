use super::Task;

/// Derive the ordered sequence of tasks the presentation layer should
/// show.
///
/// Takes the store's ascending-id order as-is; when `show_completed` is
/// false, completed tasks are dropped. Pure and side-effect-free —
/// repeated calls over unchanged input yield an identical sequence.
pub fn project(tasks: &[Task], show_completed: bool) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| show_completed || !t.completed)
        .cloned()
        .collect()
}
