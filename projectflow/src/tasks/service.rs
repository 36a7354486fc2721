//! Task operations service.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures_util::future::join_all;

use projectflow_proto::reply::ApiReply;
use projectflow_proto::task::{Task, TaskDraft, TaskId};

use super::confirm::{Decision, PendingBulkRemoval, PendingRemoval};
use super::{BulkDeleteReport, TaskOpError};
use crate::gateway::{GatewayError, TaskGateway};
use crate::notify::{Level, Notifier};
use crate::state::{Action, Store};

const CREATE_FAILED: &str = "Failed to create task";
const UPDATE_FAILED: &str = "Failed to update task";
const DELETE_FAILED: &str = "Failed to delete task";
const FETCH_FAILED: &str = "Failed to fetch tasks";
const REFRESH_FAILED: &str = "Failed to refresh tasks";
const REFRESH_OK: &str = "Tasks refreshed successfully";

/// Bridges user intents to the gateway, the store, and the notifier.
///
/// Every gateway call is wrapped: a `success: false` reply and a transport
/// error both end as one error notification and a
/// [`TaskOpError::Failed`], and neither touches the store. Calls are not
/// de-duplicated; concurrent calls run independently and their store
/// mutations apply in completion order.
pub struct TaskService<G: TaskGateway, N: Notifier> {
    gateway: G,
    store: Arc<Store>,
    notifier: N,
    /// Number of gateway calls in flight. The store's `loading` flag mirrors
    /// `in_flight > 0`.
    in_flight: AtomicUsize,
}

/// Keeps the loading flag raised while alive.
struct LoadingGuard<'a> {
    in_flight: &'a AtomicUsize,
    store: &'a Store,
}

impl<'a> LoadingGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize, store: &'a Store) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        sync_loading(in_flight, store);
        Self { in_flight, store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        sync_loading(self.in_flight, self.store);
    }
}

/// Brings the store's loading flag in line with the counter. The counter is
/// read under the store's dispatch gate, so the last update always wins.
fn sync_loading(in_flight: &AtomicUsize, store: &Store) {
    store.dispatch_with(|state| {
        let loading = in_flight.load(Ordering::SeqCst) > 0;
        (state.loading != loading).then_some(Action::SetLoading(loading))
    });
}

impl<G: TaskGateway, N: Notifier> TaskService<G, N> {
    /// Creates a service over `gateway` that mutates `store` and reports
    /// through `notifier`.
    pub fn new(gateway: G, store: Arc<Store>, notifier: N) -> Self {
        Self {
            gateway,
            store,
            notifier,
            in_flight: AtomicUsize::new(0),
        }
    }

    /// The store this service writes to.
    #[must_use]
    pub const fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// The underlying gateway.
    #[must_use]
    pub const fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Whether any gateway call is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Creates a task and appends the gateway's record to the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Failed`] if the gateway rejects the draft or
    /// cannot be reached.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskOpError> {
        let _loading = self.begin_loading();
        let result = self.gateway.create(draft).await;
        let (message, task) = self.accept_record("create", result, CREATE_FAILED)?;

        tracing::info!(id = %task.id, "task created");
        self.store.dispatch(Action::AddTask(task.clone()));
        self.notifier.notify(&message, Level::Success);
        Ok(task)
    }

    /// Updates task `id` and replaces it in the store with the gateway's record.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Failed`] if the gateway rejects the update or
    /// cannot be reached.
    pub async fn edit_task(&self, id: &TaskId, draft: &TaskDraft) -> Result<Task, TaskOpError> {
        let _loading = self.begin_loading();
        let result = self.gateway.update(id, draft).await;
        let (message, task) = self.accept_record("update", result, UPDATE_FAILED)?;

        tracing::info!(id = %task.id, "task updated");
        self.store.dispatch(Action::ReplaceTask(task.clone()));
        self.notifier.notify(&message, Level::Success);
        Ok(task)
    }

    /// Flips the completion flag of `task`.
    ///
    /// # Errors
    ///
    /// Same as [`edit_task`](Self::edit_task).
    pub async fn toggle_task_completion(&self, task: &Task) -> Result<Task, TaskOpError> {
        let draft = task.to_draft().with_done(!task.done);
        self.edit_task(&task.id, &draft).await
    }

    /// Asks to delete task `id`. Resolve with
    /// [`confirm_removal`](Self::confirm_removal).
    pub fn remove_task(&self, id: TaskId) -> PendingRemoval {
        tracing::debug!(%id, "removal awaiting confirmation");
        PendingRemoval::new(id)
    }

    /// Resolves a pending single-task deletion.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Cancelled`] if `decision` is
    /// [`Decision::Cancel`] (no gateway call is made), or
    /// [`TaskOpError::Failed`] if the gateway rejects the deletion or cannot
    /// be reached.
    pub async fn confirm_removal(
        &self,
        pending: PendingRemoval,
        decision: Decision,
    ) -> Result<(), TaskOpError> {
        if decision == Decision::Cancel {
            tracing::debug!(id = %pending.id, "removal cancelled");
            return Err(TaskOpError::Cancelled);
        }

        let _loading = self.begin_loading();
        let result = self.gateway.delete(&pending.id).await;
        let reply = self.accept("delete", result, DELETE_FAILED)?;

        tracing::info!(id = %pending.id, "task deleted");
        self.store.dispatch(Action::RemoveTask(pending.id));
        self.notifier.notify(&reply.message, Level::Success);
        Ok(())
    }

    /// Asks to delete every task in `ids` under one confirmation. Resolve
    /// with [`confirm_bulk_removal`](Self::confirm_bulk_removal).
    pub fn bulk_delete_tasks(&self, ids: Vec<TaskId>) -> PendingBulkRemoval {
        tracing::debug!(count = ids.len(), "bulk removal awaiting confirmation");
        PendingBulkRemoval::new(ids)
    }

    /// Resolves a pending bulk deletion.
    ///
    /// Issues one delete per identifier, all at once. Each accepted
    /// deletion is removed from the store; failed ones stay. Emits one
    /// success notification if anything was deleted and one error
    /// notification if anything failed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Cancelled`] if `decision` is
    /// [`Decision::Cancel`]. Partial or total failure of the batch is
    /// reported in the [`BulkDeleteReport`], not as an error.
    pub async fn confirm_bulk_removal(
        &self,
        pending: PendingBulkRemoval,
        decision: Decision,
    ) -> Result<BulkDeleteReport, TaskOpError> {
        if decision == Decision::Cancel {
            tracing::debug!(count = pending.ids.len(), "bulk removal cancelled");
            return Err(TaskOpError::Cancelled);
        }

        let _loading = self.begin_loading();
        let results = join_all(pending.ids.iter().map(|id| async move {
            let result = self.gateway.delete(id).await;
            (id, result)
        }))
        .await;

        let mut report = BulkDeleteReport::default();
        for (id, result) in results {
            match result {
                Ok(reply) if reply.success => {
                    report.success_count += 1;
                    self.store.dispatch(Action::RemoveTask(id.clone()));
                }
                Ok(reply) => {
                    tracing::warn!(%id, message = %reply.message, "bulk delete rejected");
                    report.failure_count += 1;
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "bulk delete failed");
                    report.failure_count += 1;
                }
            }
        }

        tracing::info!(
            deleted = report.success_count,
            failed = report.failure_count,
            "bulk delete finished"
        );
        if report.success_count > 0 {
            self.notifier.notify(
                &format!("Successfully deleted {} tasks", report.success_count),
                Level::Success,
            );
        }
        if report.failure_count > 0 {
            self.notifier.notify(
                &format!("Failed to delete {} tasks", report.failure_count),
                Level::Error,
            );
        }
        Ok(report)
    }

    /// Initial fetch. Loads the store silently on success; on failure
    /// records the error in the store and notifies, leaving the task list
    /// as it was.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Failed`] if the gateway cannot be reached.
    pub async fn load_tasks(&self) -> Result<usize, TaskOpError> {
        match self.fetch_into_store().await {
            Ok(count) => Ok(count),
            Err(e) => {
                self.store.dispatch(Action::SetError(Some(FETCH_FAILED.to_string())));
                Err(self.fail("fetch", FETCH_FAILED, &e.to_string()))
            }
        }
    }

    /// Re-fetches every task and reloads the store. Does not retry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskOpError::Failed`] if the gateway cannot be reached.
    pub async fn refresh_tasks(&self) -> Result<usize, TaskOpError> {
        match self.fetch_into_store().await {
            Ok(count) => {
                self.notifier.notify(REFRESH_OK, Level::Success);
                Ok(count)
            }
            Err(e) => Err(self.fail("refresh", REFRESH_FAILED, &e.to_string())),
        }
    }

    async fn fetch_into_store(&self) -> Result<usize, GatewayError> {
        let _loading = self.begin_loading();
        let reply = self.gateway.fetch_all().await?;
        let count = reply.data.len();
        tracing::info!(count, "tasks loaded");
        self.store.dispatch(Action::LoadTasks(reply.data));
        self.store
            .dispatch_with(|state| state.error.is_some().then_some(Action::SetError(None)));
        Ok(count)
    }

    fn begin_loading(&self) -> LoadingGuard<'_> {
        LoadingGuard::enter(&self.in_flight, &self.store)
    }

    /// Unwraps an accepted reply, or reports the failure.
    fn accept<T>(
        &self,
        op: &'static str,
        result: Result<ApiReply<T>, GatewayError>,
        fallback: &str,
    ) -> Result<ApiReply<T>, TaskOpError> {
        match result {
            Ok(reply) if reply.success => Ok(reply),
            Ok(reply) => {
                let message = if reply.message.is_empty() {
                    fallback.to_string()
                } else {
                    reply.message
                };
                Err(self.fail(op, &message, "rejected by gateway"))
            }
            Err(e) => Err(self.fail(op, fallback, &e.to_string())),
        }
    }

    /// Like [`accept`](Self::accept), additionally requiring the reply to
    /// carry the affected record.
    fn accept_record(
        &self,
        op: &'static str,
        result: Result<ApiReply<Task>, GatewayError>,
        fallback: &str,
    ) -> Result<(String, Task), TaskOpError> {
        let reply = self.accept(op, result, fallback)?;
        match reply.data {
            Some(task) => Ok((reply.message, task)),
            None => Err(self.fail(op, fallback, "accepted reply carried no task")),
        }
    }

    fn fail(&self, op: &'static str, message: &str, cause: &str) -> TaskOpError {
        tracing::warn!(op, %message, cause, "task operation failed");
        self.notifier.notify(message, Level::Error);
        TaskOpError::Failed {
            message: message.to_string(),
        }
    }
}
