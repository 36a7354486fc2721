//! Integration tests for the application store.
//!
//! Exercises the store through its public contract only: dispatch,
//! snapshots, and subscriptions.
//!
//! Verification command: `cargo test --test store_flow`

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;

use projectflow::state::{Action, AppState, Filter, Page, Store, Transition, User, filter_tasks};
use projectflow_proto::task::{Priority, Task, TaskId};

// =============================================================================
// Test helpers
// =============================================================================

fn task(id: &str, name: &str, priority: Priority, done: bool) -> Task {
    Task {
        id: TaskId::new(id),
        name: name.to_string(),
        description: String::new(),
        priority,
        due_date: None,
        done,
        created_at: Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(),
    }
}

fn assert_view_consistent(state: &AppState) {
    assert_eq!(
        state.filtered_tasks,
        filter_tasks(&state.tasks, state.filter, &state.search_term)
    );
}

// =============================================================================
// Filtered view
// =============================================================================

#[test]
fn filtered_view_tracks_every_transition() {
    let store = Store::new();
    let actions = vec![
        Action::AddTask(task("1", "Write docs", Priority::High, false)),
        Action::AddTask(task("2", "Review PR", Priority::Low, true)),
        Action::SetFilter(Filter::Completed),
        Action::AddTask(task("3", "Document API", Priority::Medium, true)),
        Action::SetSearch("DOC".to_string()),
        Action::ReplaceTask(task("1", "Write docs", Priority::High, true)),
        Action::RemoveTask(TaskId::new("3")),
        Action::SetFilter(Filter::High),
        Action::SetSearch(String::new()),
        Action::RemoveTask(TaskId::new("missing")),
    ];

    for action in actions {
        store.dispatch(action);
        assert_view_consistent(&store.snapshot());
    }

    let state = store.snapshot();
    assert_eq!(state.filtered_tasks.len(), 1);
    assert_eq!(state.filtered_tasks[0].id.as_str(), "1");
}

#[test]
fn filter_examples_through_store() {
    let store = Store::new();
    store.dispatch(Action::LoadTasks(vec![
        task("1", "Write docs", Priority::High, false),
        task("2", "Review PR", Priority::Low, true),
    ]));

    store.dispatch(Action::SetFilter(Filter::Completed));
    assert_eq!(store.snapshot().filtered_tasks[0].id.as_str(), "2");

    store.dispatch(Action::SetFilter(Filter::High));
    assert_eq!(store.snapshot().filtered_tasks[0].id.as_str(), "1");

    store.dispatch(Action::SetFilter(Filter::All));
    store.dispatch(Action::SetSearch("doc".to_string()));
    let state = store.snapshot();
    assert_eq!(state.filtered_tasks.len(), 1);
    assert_eq!(state.filtered_tasks[0].id.as_str(), "1");
}

// =============================================================================
// Collection mutations
// =============================================================================

#[test]
fn add_appends_last() {
    let store = Store::new();
    store.dispatch(Action::AddTask(task("1", "First task", Priority::Low, false)));
    store.dispatch(Action::AddTask(task("2", "Second task", Priority::Low, false)));

    let state = store.snapshot();
    assert_eq!(state.tasks.last().map(|t| t.id.as_str()), Some("2"));
    assert_eq!(state.tasks.len(), 2);
}

#[test]
fn replace_miss_leaves_collection_and_subscribers_alone() {
    let store = Store::new();
    store.dispatch(Action::LoadTasks(vec![
        task("1", "First task", Priority::Low, false),
        task("2", "Second task", Priority::High, false),
    ]));
    let before = store.snapshot();

    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| *counter.lock() += 1);

    let transition = store.dispatch(Action::ReplaceTask(task("9", "Ghost task", Priority::Low, true)));

    assert_eq!(transition, Transition::Unchanged);
    assert_eq!(store.snapshot().tasks, before.tasks);
    assert_eq!(*calls.lock(), 0);
}

#[test]
fn snapshots_survive_later_dispatches() {
    let store = Store::new();
    store.dispatch(Action::AddTask(task("1", "First task", Priority::Low, false)));
    let old = store.snapshot();

    store.dispatch(Action::RemoveTask(TaskId::new("1")));

    assert_eq!(old.tasks.len(), 1);
    assert!(store.snapshot().tasks.is_empty());
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn logout_is_observed_as_one_transition() {
    let store = Store::new();
    store.dispatch(Action::SetUser(Some(User {
        name: "ada".to_string(),
        id: "u-1".to_string(),
    })));
    store.dispatch(Action::SetActivePage(Page::Profile));

    let seen: Arc<Mutex<Vec<(bool, Page)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    store.subscribe(move |state| sink.lock().push((state.is_authenticated(), state.active_page)));

    store.dispatch(Action::Logout);

    assert_eq!(*seen.lock(), vec![(false, Page::Dashboard)]);
}

#[test]
fn redirecting_listener_keeps_every_listener_in_order() {
    let store = Arc::new(Store::new());
    let seen: Arc<Mutex<Vec<Vec<Page>>>> = Arc::new(Mutex::new(vec![Vec::new(); 3]));

    for slot in 0..3 {
        let sink = Arc::clone(&seen);
        let inner = Arc::clone(&store);
        store.subscribe(move |state| {
            sink.lock()[slot].push(state.active_page);
            // The middle listener bounces signed-out users off the profile page.
            if slot == 1 && state.active_page == Page::Profile && !state.is_authenticated() {
                inner.dispatch(Action::SetActivePage(Page::Login));
            }
        });
    }

    store.dispatch(Action::SetActivePage(Page::Profile));

    let expected = vec![Page::Profile, Page::Login];
    assert_eq!(*seen.lock(), vec![expected.clone(), expected.clone(), expected]);
    assert_eq!(store.snapshot().active_page, Page::Login);
}

#[test]
fn unsubscribed_listener_is_not_called() {
    let store = Store::new();
    let calls = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&calls);
    let id = store.subscribe(move |_| *counter.lock() += 1);

    store.dispatch(Action::SetSearch("a".to_string()));
    assert!(store.unsubscribe(id));
    store.dispatch(Action::SetSearch("b".to_string()));

    assert_eq!(*calls.lock(), 1);
    assert_eq!(store.subscriber_count(), 0);
}
