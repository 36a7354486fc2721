//! In-process task gateway.
//!
//! Backs demo mode and tests. Holds the task collection behind a lock,
//! assigns identifiers and creation timestamps the way the remote API does,
//! and can be told to reject or drop individual calls.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use projectflow_proto::codec::{self, CodecError};
use projectflow_proto::reply::{ApiReply, TaskListReply};
use projectflow_proto::task::{Priority, Task, TaskDraft, TaskId};

use super::{GatewayError, TaskGateway};

/// How an injected fault fails a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fault {
    /// Reply with `success: false` and this message.
    Reject(String),
    /// Fail at the transport level.
    Unavailable,
}

#[derive(Debug, Default)]
struct Faults {
    fetch: Option<Fault>,
    create: Option<Fault>,
    by_id: HashMap<TaskId, Fault>,
}

/// Errors loading a seed task list.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// The seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    Read {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The seed file is not a task list.
    #[error("invalid seed file: {0}")]
    Decode(#[from] CodecError),
}

/// Gateway backed by an in-memory task list.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    tasks: Mutex<Vec<Task>>,
    faults: Mutex<Faults>,
    latency: Duration,
    calls: AtomicUsize,
}

impl InMemoryGateway {
    /// Creates an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gateway pre-loaded with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    /// Creates a gateway pre-loaded from a JSON task list, either bare or
    /// wrapped in a `{"data": [...]}` envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError`] if `json` is not a task list.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        Ok(Self::with_tasks(codec::decode_task_list(json)?))
    }

    /// Creates a gateway pre-loaded from the JSON task list at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the file cannot be read or decoded.
    pub fn from_seed_file(path: &Path) -> Result<Self, SeedError> {
        let json = std::fs::read_to_string(path).map_err(|e| SeedError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let gateway = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), count = gateway.tasks.lock().len(), "seeded tasks");
        Ok(gateway)
    }

    /// Creates a gateway holding a handful of sample tasks.
    #[must_use]
    pub fn demo() -> Self {
        let now = Utc::now();
        let today = now.date_naive();
        let sample = [
            ("Write project brief", Priority::High, Some(2), false),
            ("Review pull requests", Priority::Medium, Some(0), false),
            ("Plan sprint retro", Priority::Low, None, false),
            ("Update dependencies", Priority::Medium, Some(-3), false),
            ("Set up CI pipeline", Priority::High, None, true),
        ];
        let tasks = sample
            .into_iter()
            .enumerate()
            .map(|(i, (name, priority, due_in_days, done))| Task {
                id: Self::next_id(),
                name: name.to_string(),
                description: String::new(),
                priority,
                due_date: due_in_days.map(|d| today + ChronoDuration::days(d)),
                done,
                created_at: now - ChronoDuration::hours(i64::try_from(i).unwrap_or(0)),
            })
            .collect();
        Self::with_tasks(tasks)
    }

    /// Delays every call by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fails every update and delete of `id` with `fault`.
    pub fn fail_on(&self, id: &TaskId, fault: Fault) {
        self.faults.lock().by_id.insert(id.clone(), fault);
    }

    /// Removes a fault installed with [`fail_on`](Self::fail_on).
    pub fn clear_fault(&self, id: &TaskId) {
        self.faults.lock().by_id.remove(id);
    }

    /// Fails fetches with `fault`, or stops failing them with `None`.
    pub fn set_fetch_fault(&self, fault: Option<Fault>) {
        self.faults.lock().fetch = fault;
    }

    /// Fails creates with `fault`, or stops failing them with `None`.
    pub fn set_create_fault(&self, fault: Option<Fault>) {
        self.faults.lock().create = fault;
    }

    /// Current server-side task list.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().clone()
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_id() -> TaskId {
        TaskId::new(Uuid::now_v7().simple().to_string())
    }

    async fn begin_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn fault_for(&self, id: &TaskId) -> Option<Fault> {
        self.faults.lock().by_id.get(id).cloned()
    }
}

/// Turns a fault into the reply or error the call should produce.
fn faulted<T>(fault: Fault, op: &str) -> Result<ApiReply<T>, GatewayError> {
    match fault {
        Fault::Reject(message) => {
            tracing::debug!(op, %message, "injected rejection");
            Ok(ApiReply::rejected(message))
        }
        Fault::Unavailable => {
            tracing::debug!(op, "injected transport failure");
            Err(GatewayError::Unavailable(format!("{op} dropped")))
        }
    }
}

impl TaskGateway for InMemoryGateway {
    async fn fetch_all(&self) -> Result<TaskListReply, GatewayError> {
        self.begin_call().await;
        let fault = self.faults.lock().fetch.clone();
        match fault {
            Some(Fault::Unavailable) => {
                Err(GatewayError::Unavailable("fetch dropped".to_string()))
            }
            Some(Fault::Reject(message)) => Err(GatewayError::Unavailable(message)),
            None => Ok(TaskListReply { data: self.tasks() }),
        }
    }

    async fn create(&self, draft: &TaskDraft) -> Result<ApiReply<Task>, GatewayError> {
        self.begin_call().await;
        let fault = self.faults.lock().create.clone();
        if let Some(fault) = fault {
            return faulted(fault, "create");
        }
        if draft.name.trim().is_empty() {
            return Ok(ApiReply::rejected("Task name is required"));
        }

        let task = Task {
            id: Self::next_id(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            priority: draft.priority,
            due_date: draft.due_date,
            done: draft.done,
            created_at: Utc::now(),
        };
        self.tasks.lock().push(task.clone());
        tracing::debug!(id = %task.id, "task created");
        Ok(ApiReply::accepted("Task created successfully", Some(task)))
    }

    async fn update(&self, id: &TaskId, draft: &TaskDraft) -> Result<ApiReply<Task>, GatewayError> {
        self.begin_call().await;
        if let Some(fault) = self.fault_for(id) {
            return faulted(fault, "update");
        }

        let mut tasks = self.tasks.lock();
        let Some(task) = tasks.iter_mut().find(|t| &t.id == id) else {
            return Ok(ApiReply::rejected("Task not found"));
        };
        task.name.clone_from(&draft.name);
        task.description.clone_from(&draft.description);
        task.priority = draft.priority;
        task.due_date = draft.due_date;
        task.done = draft.done;
        Ok(ApiReply::accepted("Task updated successfully", Some(task.clone())))
    }

    async fn delete(&self, id: &TaskId) -> Result<ApiReply<()>, GatewayError> {
        self.begin_call().await;
        if let Some(fault) = self.fault_for(id) {
            return faulted(fault, "delete");
        }

        let mut tasks = self.tasks.lock();
        let before = tasks.len();
        tasks.retain(|t| &t.id != id);
        if tasks.len() == before {
            return Ok(ApiReply::rejected("Task not found"));
        }
        Ok(ApiReply::accepted("Task deleted successfully", None))
    }
}
