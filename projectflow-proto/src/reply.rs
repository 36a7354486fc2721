//! Reply envelopes returned by the remote task API.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Reply to a mutating call (create, update, delete).
///
/// `success: false` is a business rejection carrying a user-facing
/// `message`; transport failures never produce a reply at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiReply<T> {
    /// Whether the API accepted the call.
    pub success: bool,
    /// User-facing message describing the outcome.
    #[serde(default)]
    pub message: String,
    /// Affected record, present on successful create/update.
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiReply<T> {
    /// Builds a successful reply.
    pub fn accepted(message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }

    /// Builds a rejection reply.
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Reply to a full-collection fetch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskListReply {
    /// Every task known to the API, in API order.
    #[serde(default)]
    pub data: Vec<Task>,
}
