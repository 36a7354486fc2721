//! Task operations.
//!
//! [`TaskService`] turns user intents into gateway calls, applies the
//! resulting mutations to the [`Store`](crate::state::Store), and reports
//! outcomes through a [`Notifier`](crate::notify::Notifier). Deletions go
//! through an explicit confirmation step ([`PendingRemoval`],
//! [`PendingBulkRemoval`]) that the view layer resolves.

pub mod confirm;
pub mod service;

pub use confirm::{Decision, PendingBulkRemoval, PendingConfirmation, PendingRemoval};
pub use service::TaskService;

use thiserror::Error;

/// Message returned when the user declines a confirmation.
pub const CANCELLED_MESSAGE: &str = "Action cancelled";

/// Why a task operation did not complete.
///
/// Gateway rejections and transport failures are deliberately folded into
/// [`TaskOpError::Failed`]; callers only ever need the message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskOpError {
    /// The user declined the confirmation; nothing was sent.
    #[error("Action cancelled")]
    Cancelled,
    /// The gateway rejected the call or could not be reached.
    #[error("{message}")]
    Failed {
        /// User-facing message (already shown as a notification).
        message: String,
    },
}

impl TaskOpError {
    /// User-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Cancelled => CANCELLED_MESSAGE,
            Self::Failed { message } => message,
        }
    }
}

/// Outcome of a confirmed bulk deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkDeleteReport {
    /// Deletions the gateway accepted.
    pub success_count: usize,
    /// Deletions rejected or lost in transport.
    pub failure_count: usize,
}

impl BulkDeleteReport {
    /// The batch counts as successful if at least one task was deleted.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success_count > 0
    }
}
