//! Property-based tests for the task store invariants:
//!
//! 1. Id uniqueness & monotonicity: under arbitrary add/delete/toggle
//!    sequences, live ids stay distinct and ascending, and a new id is
//!    always greater than every id ever assigned in the session.
//! 2. Filter correctness: hiding completed tasks yields exactly the full
//!    view minus its completed entries, in the same order.
//!
//! Run with: cargo test --test proptest_store

use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use taskdeck::tasks::{view, SnapshotStore, Task, TaskStore};

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    Delete(usize),
    Toggle(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        // Blank submissions are generated too — they must be rejected
        // without burning an id.
        "[a-z ]{0,12}".prop_map(Op::Add),
        (0usize..16).prop_map(Op::Delete),
        (0usize..16).prop_map(Op::Toggle),
    ]
}

/// Pick a live id to target, or a guaranteed miss when the list is empty.
fn pick(tasks: &[Task], i: usize) -> u64 {
    if tasks.is_empty() {
        i as u64 + 1_000
    } else {
        tasks[i % tasks.len()].id
    }
}

proptest! {
    #[test]
    fn live_ids_stay_distinct_and_monotonic(
        ops in proptest::collection::vec(op_strategy(), 1..40),
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let dir = tempfile::TempDir::new().unwrap();
            let (mut store, _) =
                TaskStore::open(SnapshotStore::new(dir.path().join("tasks.json"))).await;
            let mut max_assigned = 0u64;

            for op in ops {
                match op {
                    Op::Add(text) => {
                        if let Ok(applied) = store.add(&text).await {
                            prop_assert!(
                                applied.id > max_assigned,
                                "id {} repeats one already assigned",
                                applied.id
                            );
                            max_assigned = applied.id;
                        }
                    }
                    Op::Delete(i) => {
                        let target = pick(store.list_all(), i);
                        let _ = store.delete(target).await;
                    }
                    Op::Toggle(i) => {
                        let target = pick(store.list_all(), i);
                        let _ = store.toggle(target).await;
                    }
                }

                let ids: Vec<u64> = store.list_all().iter().map(|t| t.id).collect();
                let mut sorted = ids.clone();
                sorted.sort_unstable();
                sorted.dedup();
                prop_assert_eq!(&ids, &sorted, "live ids must be ascending and distinct");
            }
            Ok::<(), TestCaseError>(())
        })?;
    }
}

fn task_list_strategy() -> impl Strategy<Value = Vec<Task>> {
    proptest::collection::vec(("[a-z]{1,8}", any::<bool>()), 0..24).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (text, completed))| Task {
                id: i as u64 + 1,
                text,
                completed,
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn hiding_completed_is_full_view_minus_completed(tasks in task_list_strategy()) {
        let hidden = view::project(&tasks, false);
        let full = view::project(&tasks, true);

        let expected: Vec<Task> = full.iter().filter(|t| !t.completed).cloned().collect();
        prop_assert_eq!(&hidden, &expected);

        // Both projections preserve ascending-id order.
        let ids: Vec<u64> = full.iter().map(|t| t.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        prop_assert_eq!(ids, sorted);
    }
}
