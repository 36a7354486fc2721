//! Remote task gateway abstraction.
//!
//! Defines the [`TaskGateway`] trait through which all task data reaches the
//! client. Concrete implementations:
//! - [`memory::InMemoryGateway`]: in-process backend for demo mode and tests

pub mod memory;

use std::future::Future;
use std::sync::Arc;

use projectflow_proto::reply::{ApiReply, TaskListReply};
use projectflow_proto::task::{Task, TaskDraft, TaskId};

/// Transport-level gateway failures.
///
/// Business rejections are not errors at this layer: they arrive as an
/// [`ApiReply`] with `success: false`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The API could not be reached.
    #[error("task API unavailable: {0}")]
    Unavailable(String),
}

/// CRUD access to the remote task collection.
///
/// Every call is a suspension point. Implementations assign task
/// identifiers and creation timestamps; callers never synthesize them.
pub trait TaskGateway: Send + Sync {
    /// Fetch every task.
    fn fetch_all(&self) -> impl Future<Output = Result<TaskListReply, GatewayError>> + Send;

    /// Create a task from `draft`. A successful reply carries the stored record.
    fn create(
        &self,
        draft: &TaskDraft,
    ) -> impl Future<Output = Result<ApiReply<Task>, GatewayError>> + Send;

    /// Overwrite the editable fields of task `id`. A successful reply
    /// carries the updated record.
    fn update(
        &self,
        id: &TaskId,
        draft: &TaskDraft,
    ) -> impl Future<Output = Result<ApiReply<Task>, GatewayError>> + Send;

    /// Delete task `id`.
    fn delete(
        &self,
        id: &TaskId,
    ) -> impl Future<Output = Result<ApiReply<()>, GatewayError>> + Send;
}

impl<G: TaskGateway> TaskGateway for Arc<G> {
    fn fetch_all(&self) -> impl Future<Output = Result<TaskListReply, GatewayError>> + Send {
        (**self).fetch_all()
    }

    fn create(
        &self,
        draft: &TaskDraft,
    ) -> impl Future<Output = Result<ApiReply<Task>, GatewayError>> + Send {
        (**self).create(draft)
    }

    fn update(
        &self,
        id: &TaskId,
        draft: &TaskDraft,
    ) -> impl Future<Output = Result<ApiReply<Task>, GatewayError>> + Send {
        (**self).update(id, draft)
    }

    fn delete(
        &self,
        id: &TaskId,
    ) -> impl Future<Output = Result<ApiReply<()>, GatewayError>> + Send {
        (**self).delete(id)
    }
}
