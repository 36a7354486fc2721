//! Integration tests for the task operations service.
//!
//! Drives `TaskService` against the in-memory gateway and checks the
//! resulting store state and notifications together.
//!
//! Verification command: `cargo test --test task_operations`

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use projectflow::gateway::memory::{Fault, InMemoryGateway};
use projectflow::gateway::{GatewayError, TaskGateway};
use projectflow::notify::{Level, Notification, RecordingNotifier};
use projectflow::state::Store;
use projectflow::tasks::{BulkDeleteReport, Decision, TaskOpError, TaskService};
use projectflow_proto::reply::{ApiReply, TaskListReply};
use projectflow_proto::task::{Task, TaskDraft, TaskId};

// =============================================================================
// Test helpers
// =============================================================================

struct Harness<G: TaskGateway> {
    service: TaskService<Arc<G>, Arc<RecordingNotifier>>,
    gateway: Arc<G>,
    notifier: Arc<RecordingNotifier>,
    store: Arc<Store>,
}

fn harness<G: TaskGateway>(gateway: G) -> Harness<G> {
    let gateway = Arc::new(gateway);
    let notifier = Arc::new(RecordingNotifier::new());
    let store = Arc::new(Store::new());
    let service = TaskService::new(Arc::clone(&gateway), Arc::clone(&store), Arc::clone(&notifier));
    Harness {
        service,
        gateway,
        notifier,
        store,
    }
}

/// Creates `names` through the service and clears the notifications that
/// produced.
async fn seed(h: &Harness<InMemoryGateway>, names: &[&str]) -> Vec<Task> {
    let mut tasks = Vec::new();
    for name in names {
        tasks.push(h.service.create_task(&TaskDraft::new(*name)).await.unwrap());
    }
    h.notifier.clear();
    tasks
}

/// Delegates to an in-memory gateway, delaying each update by the next
/// queued duration.
struct DelayedUpdates {
    inner: InMemoryGateway,
    delays: Mutex<VecDeque<Duration>>,
}

impl TaskGateway for DelayedUpdates {
    async fn fetch_all(&self) -> Result<TaskListReply, GatewayError> {
        self.inner.fetch_all().await
    }

    async fn create(&self, draft: &TaskDraft) -> Result<ApiReply<Task>, GatewayError> {
        self.inner.create(draft).await
    }

    async fn update(&self, id: &TaskId, draft: &TaskDraft) -> Result<ApiReply<Task>, GatewayError> {
        let delay = self.delays.lock().pop_front().unwrap_or_default();
        tokio::time::sleep(delay).await;
        self.inner.update(id, draft).await
    }

    async fn delete(&self, id: &TaskId) -> Result<ApiReply<()>, GatewayError> {
        self.inner.delete(id).await
    }
}

// =============================================================================
// Bulk deletion
// =============================================================================

#[tokio::test]
async fn bulk_delete_partial_failure() {
    let h = harness(InMemoryGateway::new());
    let tasks = seed(&h, &["First task", "Second task", "Third task"]).await;
    let ids: Vec<TaskId> = tasks.iter().map(|t| t.id.clone()).collect();
    h.gateway.fail_on(&ids[1], Fault::Unavailable);

    let pending = h.service.bulk_delete_tasks(ids.clone());
    assert_eq!(pending.prompt(), "Are you sure you want to delete 3 tasks?");
    let report = h
        .service
        .confirm_bulk_removal(pending, Decision::Confirm)
        .await
        .unwrap();

    assert_eq!(
        report,
        BulkDeleteReport {
            success_count: 2,
            failure_count: 1
        }
    );
    assert!(report.success());

    let remaining: Vec<TaskId> = h.store.snapshot().tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(remaining, vec![ids[1].clone()]);

    assert_eq!(
        h.notifier.notifications(),
        vec![
            Notification::new("Successfully deleted 2 tasks", Level::Success),
            Notification::new("Failed to delete 1 tasks", Level::Error),
        ]
    );
}

#[tokio::test]
async fn bulk_delete_counts_rejections_as_failures() {
    let h = harness(InMemoryGateway::new());
    let tasks = seed(&h, &["First task", "Second task"]).await;
    for task in &tasks {
        h.gateway.fail_on(&task.id, Fault::Reject("Locked".to_string()));
    }

    let pending = h.service.bulk_delete_tasks(tasks.iter().map(|t| t.id.clone()).collect());
    let report = h
        .service
        .confirm_bulk_removal(pending, Decision::Confirm)
        .await
        .unwrap();

    assert_eq!(report.success_count, 0);
    assert_eq!(report.failure_count, 2);
    assert!(!report.success());
    assert_eq!(h.store.snapshot().tasks.len(), 2);
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::new("Failed to delete 2 tasks", Level::Error)]
    );
}

#[tokio::test]
async fn cancelled_bulk_delete_touches_nothing() {
    let h = harness(InMemoryGateway::new());
    let tasks = seed(&h, &["First task", "Second task"]).await;
    let calls = h.gateway.call_count();

    let pending = h.service.bulk_delete_tasks(tasks.iter().map(|t| t.id.clone()).collect());
    let result = h.service.confirm_bulk_removal(pending, Decision::Cancel).await;

    assert_eq!(result, Err(TaskOpError::Cancelled));
    assert_eq!(h.gateway.call_count(), calls);
    assert_eq!(h.store.snapshot().tasks.len(), 2);
    assert!(h.notifier.notifications().is_empty());
}

// =============================================================================
// Single-task operations
// =============================================================================

#[tokio::test]
async fn toggle_twice_restores_completion() {
    let h = harness(InMemoryGateway::new());
    let original = seed(&h, &["Write docs"]).await.remove(0);

    let toggled = h.service.toggle_task_completion(&original).await.unwrap();
    assert!(toggled.done);
    assert!(h.store.snapshot().tasks[0].done);

    let restored = h.service.toggle_task_completion(&toggled).await.unwrap();
    assert_eq!(restored.done, original.done);
    assert_eq!(h.store.snapshot().tasks[0], restored);
    assert_eq!(h.notifier.at_level(Level::Success).len(), 2);
}

#[tokio::test]
async fn rejection_and_transport_failure_look_alike() {
    let h = harness(InMemoryGateway::new());
    let task = seed(&h, &["Write docs"]).await.remove(0);
    let before = h.store.snapshot();

    h.gateway
        .fail_on(&task.id, Fault::Reject("Failed to update task".to_string()));
    let rejected = h.service.edit_task(&task.id, &TaskDraft::new("Renamed")).await;

    h.gateway.fail_on(&task.id, Fault::Unavailable);
    let dropped = h.service.edit_task(&task.id, &TaskDraft::new("Renamed")).await;

    assert_eq!(rejected, dropped);
    assert_eq!(
        rejected,
        Err(TaskOpError::Failed {
            message: "Failed to update task".to_string()
        })
    );
    assert_eq!(h.store.snapshot().tasks, before.tasks);
    let errors = h.notifier.at_level(Level::Error);
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], errors[1]);
}

#[tokio::test]
async fn failed_delete_keeps_task() {
    let h = harness(InMemoryGateway::new());
    let task = seed(&h, &["Write docs"]).await.remove(0);
    h.gateway.fail_on(&task.id, Fault::Unavailable);

    let pending = h.service.remove_task(task.id.clone());
    let result = h.service.confirm_removal(pending, Decision::Confirm).await;

    assert_eq!(result.unwrap_err().message(), "Failed to delete task");
    assert_eq!(h.store.snapshot().tasks, vec![task]);
}

#[tokio::test]
async fn cancelled_removal_makes_no_gateway_call() {
    let h = harness(InMemoryGateway::new());
    let task = seed(&h, &["Write docs"]).await.remove(0);
    let calls = h.gateway.call_count();

    let pending = h.service.remove_task(task.id.clone());
    assert_eq!(pending.prompt(), "Are you sure you want to delete this task?");
    let result = h.service.confirm_removal(pending, Decision::from(false)).await;

    assert_eq!(result.unwrap_err().message(), "Action cancelled");
    assert_eq!(h.gateway.call_count(), calls);
    assert!(h.notifier.notifications().is_empty());
}

// =============================================================================
// Loading and concurrency
// =============================================================================

#[tokio::test(start_paused = true)]
async fn loading_is_raised_while_a_call_is_in_flight() {
    let h = Arc::new(harness(
        InMemoryGateway::new().with_latency(Duration::from_millis(100)),
    ));
    assert!(!h.store.snapshot().loading);

    let worker = Arc::clone(&h);
    let call = tokio::spawn(async move { worker.service.refresh_tasks().await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(h.store.snapshot().loading);
    assert!(h.service.is_loading());

    call.await.unwrap().unwrap();
    assert!(!h.store.snapshot().loading);
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::new("Tasks refreshed successfully", Level::Success)]
    );
}

#[tokio::test(start_paused = true)]
async fn overlapping_calls_keep_loading_until_the_last_finishes() {
    let h = Arc::new(harness(
        InMemoryGateway::new().with_latency(Duration::from_millis(100)),
    ));
    let first = Arc::clone(&h);
    let a = tokio::spawn(async move { first.service.refresh_tasks().await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = Arc::clone(&h);
    let b = tokio::spawn(async move { second.service.refresh_tasks().await });

    a.await.unwrap().unwrap();
    assert!(h.store.snapshot().loading);
    b.await.unwrap().unwrap();
    assert!(!h.store.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn concurrent_edits_apply_the_last_resolved_response() {
    let inner = InMemoryGateway::new();
    let task = inner
        .create(&TaskDraft::new("Original"))
        .await
        .unwrap()
        .data
        .unwrap();
    let h = harness(DelayedUpdates {
        inner,
        delays: Mutex::new(VecDeque::from([
            Duration::from_millis(200),
            Duration::from_millis(50),
        ])),
    });
    h.service.load_tasks().await.unwrap();

    // The first edit is issued first but resolves last.
    let slow_draft = TaskDraft::new("Slow edit");
    let fast_draft = TaskDraft::new("Fast edit");
    let (slow, fast) = tokio::join!(
        h.service.edit_task(&task.id, &slow_draft),
        h.service.edit_task(&task.id, &fast_draft),
    );
    assert_eq!(slow.unwrap().name, "Slow edit");
    assert_eq!(fast.unwrap().name, "Fast edit");

    let state = h.store.snapshot();
    assert_eq!(state.tasks.len(), 1);
    assert_eq!(state.tasks[0].name, "Slow edit");
    assert_eq!(h.gateway.inner.tasks()[0].name, "Slow edit");
}

#[tokio::test]
async fn subscriber_may_query_the_service_while_loading() {
    let store = Arc::new(Store::new());
    let service = Arc::new(TaskService::new(
        InMemoryGateway::demo(),
        Arc::clone(&store),
        Arc::new(RecordingNotifier::new()),
    ));

    let observed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&observed);
    let weak = Arc::downgrade(&service);
    store.subscribe(move |state| {
        if let Some(service) = weak.upgrade() {
            sink.lock().push((state.loading, service.is_loading()));
        }
    });

    let refreshed = tokio::time::timeout(Duration::from_secs(2), service.refresh_tasks())
        .await
        .unwrap();

    assert_eq!(refreshed.unwrap(), 5);
    assert_eq!(
        *observed.lock(),
        vec![(true, true), (true, true), (false, false)]
    );
}

// =============================================================================
// Fetching
// =============================================================================

#[tokio::test]
async fn failed_initial_load_leaves_empty_valid_store() {
    let gateway = InMemoryGateway::demo();
    gateway.set_fetch_fault(Some(Fault::Unavailable));
    let h = harness(gateway);

    let result = h.service.load_tasks().await;

    assert!(result.is_err());
    let state = h.store.snapshot();
    assert!(state.tasks.is_empty());
    assert!(state.filtered_tasks.is_empty());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Failed to fetch tasks"));
    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::new("Failed to fetch tasks", Level::Error)]
    );
}

#[tokio::test]
async fn refresh_failure_keeps_current_tasks() {
    let h = harness(InMemoryGateway::demo());
    assert_eq!(h.service.load_tasks().await.unwrap(), 5);
    assert!(h.notifier.notifications().is_empty());

    h.gateway.set_fetch_fault(Some(Fault::Unavailable));
    let result = h.service.refresh_tasks().await;

    assert_eq!(result.unwrap_err().message(), "Failed to refresh tasks");
    assert_eq!(h.store.snapshot().tasks.len(), 5);
}
