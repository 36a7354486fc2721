//! JSON encoding and decoding for task API payloads.

use crate::reply::TaskListReply;
use crate::task::Task;

/// Error type for codec encode/decode operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Decodes a task list from JSON.
///
/// Accepts both the API's list envelope (`{"data": [...]}`) and a bare
/// JSON array of tasks, which is what exported seed files usually contain.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if the input is neither shape.
pub fn decode_task_list(json: &str) -> Result<Vec<Task>, CodecError> {
    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Shape {
        Envelope(TaskListReply),
        Bare(Vec<Task>),
    }

    Ok(match serde_json::from_str(json)? {
        Shape::Envelope(reply) => reply.data,
        Shape::Bare(tasks) => tasks,
    })
}

/// Encodes a task list in the API's list envelope.
///
/// # Errors
///
/// Returns [`CodecError::Serialization`] if serialization fails.
pub fn encode_task_list(tasks: &[Task]) -> Result<String, CodecError> {
    let reply = TaskListReply {
        data: tasks.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&reply)?)
}
