//! Data types and JSON codec for the `ProjectFlow` task API.

pub mod codec;
pub mod reply;
pub mod task;

pub use reply::{ApiReply, TaskListReply};
pub use task::{DraftError, Priority, Task, TaskDraft, TaskId};
