//! Confirmation requests for destructive task operations.
//!
//! Deleting is two-step: the service hands back a pending request carrying
//! the prompt, the view layer asks the user however it likes, and the
//! answer goes back to the service as a [`Decision`]. Nothing reaches the
//! gateway before that.

use projectflow_proto::task::TaskId;

/// The user's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Go ahead.
    Confirm,
    /// Abort without touching anything.
    Cancel,
}

impl From<bool> for Decision {
    fn from(confirmed: bool) -> Self {
        if confirmed { Self::Confirm } else { Self::Cancel }
    }
}

/// A single-task deletion awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending removal does nothing until it is resolved"]
pub struct PendingRemoval {
    pub(crate) id: TaskId,
}

impl PendingRemoval {
    pub(crate) const fn new(id: TaskId) -> Self {
        Self { id }
    }

    /// Task that would be deleted.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.id
    }

    /// Question to put to the user.
    #[must_use]
    pub fn prompt(&self) -> String {
        "Are you sure you want to delete this task?".to_string()
    }
}

/// A multi-task deletion awaiting one confirmation for the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending removal does nothing until it is resolved"]
pub struct PendingBulkRemoval {
    pub(crate) ids: Vec<TaskId>,
}

impl PendingBulkRemoval {
    pub(crate) const fn new(ids: Vec<TaskId>) -> Self {
        Self { ids }
    }

    /// Tasks that would be deleted.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.ids
    }

    /// Question to put to the user.
    #[must_use]
    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete {} tasks?", self.ids.len())
    }
}

/// Either kind of pending deletion, for views that hold one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirmation {
    /// One task.
    Single(PendingRemoval),
    /// A batch.
    Bulk(PendingBulkRemoval),
}

impl PendingConfirmation {
    /// Question to put to the user.
    #[must_use]
    pub fn prompt(&self) -> String {
        match self {
            Self::Single(p) => p.prompt(),
            Self::Bulk(p) => p.prompt(),
        }
    }
}

impl From<PendingRemoval> for PendingConfirmation {
    fn from(p: PendingRemoval) -> Self {
        Self::Single(p)
    }
}

impl From<PendingBulkRemoval> for PendingConfirmation {
    fn from(p: PendingBulkRemoval) -> Self {
        Self::Bulk(p)
    }
}
