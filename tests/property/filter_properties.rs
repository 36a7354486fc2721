//! Property-based tests for the filter predicate and the store's filtered view.
//!
//! Uses proptest to verify:
//! 1. The predicate is pure and leaves its input untouched.
//! 2. Its output is exactly the in-order subsequence of matching tasks.
//! 3. After any sequence of collection/filter/search actions, the store's
//!    filtered view equals the predicate evaluated fresh.

use chrono::{DateTime, Utc};
use proptest::prelude::*;

use projectflow::state::{Action, Filter, Store, filter_tasks};
use projectflow_proto::task::{Priority, Task, TaskId};

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High)
    ]
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop::sample::select(Filter::ALL.to_vec())
}

/// Small id space so replaces and removes hit existing tasks often.
fn arb_task() -> impl Strategy<Value = Task> {
    (
        "t[0-5]",
        "[A-Za-z ]{0,12}",
        arb_priority(),
        any::<bool>(),
        0i64..2_000_000_000,
    )
        .prop_map(|(id, name, priority, done, secs)| Task {
            id: TaskId::new(id),
            name,
            description: String::new(),
            priority,
            due_date: None,
            done,
            created_at: DateTime::<Utc>::from_timestamp(secs, 0).unwrap(),
        })
}

fn arb_search() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[A-Za-z ]{1,3}"]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        arb_task().prop_map(Action::AddTask),
        arb_task().prop_map(Action::ReplaceTask),
        "t[0-5]".prop_map(|id| Action::RemoveTask(TaskId::new(id))),
        arb_filter().prop_map(Action::SetFilter),
        arb_search().prop_map(Action::SetSearch),
    ]
}

proptest! {
    /// Same inputs, same output; the input is not modified.
    #[test]
    fn predicate_is_pure(
        tasks in prop::collection::vec(arb_task(), 0..12),
        filter in arb_filter(),
        search in arb_search(),
    ) {
        let before = tasks.clone();
        let first = filter_tasks(&tasks, filter, &search);
        let second = filter_tasks(&tasks, filter, &search);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&tasks, &before);
    }

    /// Output is exactly the matching tasks, in input order.
    #[test]
    fn predicate_keeps_matching_subsequence(
        tasks in prop::collection::vec(arb_task(), 0..12),
        filter in arb_filter(),
        search in arb_search(),
    ) {
        let needle = search.to_lowercase();
        let expected: Vec<Task> = tasks
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&needle) && filter.matches(t))
            .cloned()
            .collect();
        prop_assert_eq!(filter_tasks(&tasks, filter, &search), expected);
    }

    /// The `all` filter with an empty search is the identity.
    #[test]
    fn unfiltered_view_is_identity(tasks in prop::collection::vec(arb_task(), 0..12)) {
        prop_assert_eq!(filter_tasks(&tasks, Filter::All, ""), tasks);
    }

    /// The materialized view never drifts from the predicate.
    #[test]
    fn store_view_matches_predicate(actions in prop::collection::vec(arb_action(), 0..30)) {
        let store = Store::new();
        for action in actions {
            store.dispatch(action);
            let state = store.snapshot();
            prop_assert_eq!(
                &state.filtered_tasks,
                &filter_tasks(&state.tasks, state.filter, &state.search_term)
            );
        }
    }
}
