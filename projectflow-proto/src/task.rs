//! Task record types exchanged with the remote task API.
//!
//! Field names follow the API's JSON shape (`_id`, `taskName`, `isDone`,
//! `dueDate`, `createdAt`). Identifiers and creation timestamps are always
//! assigned by the API; clients only ever send a [`TaskDraft`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Minimum task name length in characters (after trimming).
pub const MIN_TASK_NAME_LENGTH: usize = 3;

/// Maximum task name length in characters (after trimming).
pub const MAX_TASK_NAME_LENGTH: usize = 100;

/// Maximum task description length in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Opaque task identifier assigned by the remote task API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps an identifier string issued by the API.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task priority level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    /// Low priority.
    Low,
    /// Medium priority (the default for new tasks).
    #[default]
    Medium,
    /// High priority.
    High,
}

impl Priority {
    /// Returns the next priority in the cycle Low -> Medium -> High -> Low.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Low => Self::Medium,
            Self::Medium => Self::High,
            Self::High => Self::Low,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// A task as stored by the remote task API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// API-assigned identifier. Never changes once assigned.
    #[serde(rename = "_id")]
    pub id: TaskId,
    /// Task name (3-100 characters).
    #[serde(rename = "taskName")]
    pub name: String,
    /// Free-text description, empty when absent.
    #[serde(default)]
    pub description: String,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date.
    #[serde(
        rename = "dueDate",
        default,
        with = "due_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    /// Completion flag.
    #[serde(rename = "isDone", default)]
    pub done: bool,
    /// API-assigned creation timestamp, used for recency ordering.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Returns the mutable fields of this task as a draft.
    #[must_use]
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            priority: self.priority,
            due_date: self.due_date,
            done: self.done,
        }
    }

    /// Whether this task is open and its due date lies before `today`.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.done && self.due_date.is_some_and(|due| due < today)
    }
}

/// The client-editable part of a task, sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Task name.
    #[serde(rename = "taskName")]
    pub name: String,
    /// Description, may be empty.
    #[serde(default)]
    pub description: String,
    /// Priority level.
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date.
    #[serde(
        rename = "dueDate",
        default,
        with = "due_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub due_date: Option<NaiveDate>,
    /// Completion flag.
    #[serde(rename = "isDone", default)]
    pub done: bool,
}

/// A rejected draft field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    /// Name is empty after trimming.
    #[error("Task name is required")]
    NameRequired,
    /// Name is shorter than [`MIN_TASK_NAME_LENGTH`].
    #[error("Task name must be at least {MIN_TASK_NAME_LENGTH} characters")]
    NameTooShort,
    /// Name is longer than [`MAX_TASK_NAME_LENGTH`].
    #[error("Task name must be at most {MAX_TASK_NAME_LENGTH} characters")]
    NameTooLong,
    /// Description is longer than [`MAX_DESCRIPTION_LENGTH`].
    #[error("Description must be at most {MAX_DESCRIPTION_LENGTH} characters")]
    DescriptionTooLong,
    /// Due date lies before today.
    #[error("Due date cannot be in the past")]
    DueDateInPast,
}

impl DraftError {
    /// Name of the draft field this error belongs to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NameRequired | Self::NameTooShort | Self::NameTooLong => "taskName",
            Self::DescriptionTooLong => "description",
            Self::DueDateInPast => "dueDate",
        }
    }
}

impl TaskDraft {
    /// Creates a draft with the given name and default fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }

    /// Returns a copy with name and description trimmed.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            ..self.clone()
        }
    }

    /// Validates the draft as a task form would before submitting.
    ///
    /// Reports at most one error per field. Lengths are counted in
    /// characters on the trimmed name.
    ///
    /// # Errors
    ///
    /// Returns every [`DraftError`] found, in field order.
    pub fn validate(&self, today: NaiveDate) -> Result<(), Vec<DraftError>> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len == 0 {
            errors.push(DraftError::NameRequired);
        } else if name_len < MIN_TASK_NAME_LENGTH {
            errors.push(DraftError::NameTooShort);
        } else if name_len > MAX_TASK_NAME_LENGTH {
            errors.push(DraftError::NameTooLong);
        }

        if self.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            errors.push(DraftError::DescriptionTooLong);
        }

        if self.due_date.is_some_and(|due| due < today) {
            errors.push(DraftError::DueDateInPast);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Serde adapter for optional due dates.
///
/// Dates are written as `YYYY-MM-DD`. On read, full ISO timestamps
/// (`2025-03-01T00:00:00.000Z`) are accepted and truncated to their date
/// part; `null` and the empty string read as no due date.
mod due_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&d.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(d)? else {
            return Ok(None);
        };
        let date_part = raw.split('T').next().unwrap_or_default().trim();
        if date_part.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(date_part, FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
