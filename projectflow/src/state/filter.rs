//! Filter and search predicate over the task collection.

use std::str::FromStr;

use projectflow_proto::task::{Priority, Task};

/// Which subset of tasks the list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Every task.
    #[default]
    All,
    /// Done tasks.
    Completed,
    /// Tasks not yet done.
    Pending,
    /// High priority tasks.
    High,
    /// Medium priority tasks.
    Medium,
    /// Low priority tasks.
    Low,
}

impl Filter {
    /// Every filter, in the order the list view offers them.
    pub const ALL: [Self; 6] = [
        Self::All,
        Self::Completed,
        Self::Pending,
        Self::High,
        Self::Medium,
        Self::Low,
    ];

    /// Selector key as used by the original filter buttons.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Pending => "pending",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All Tasks",
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::High => "High Priority",
            Self::Medium => "Medium Priority",
            Self::Low => "Low Priority",
        }
    }

    /// The next filter in [`Filter::ALL`] order, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Whether a single task passes this selector.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Completed => task.done,
            Self::Pending => !task.done,
            Self::High => task.priority == Priority::High,
            Self::Medium => task.priority == Priority::Medium,
            Self::Low => task.priority == Priority::Low,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown filter key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown filter: {0}")]
pub struct UnknownFilter(pub String);

impl FromStr for Filter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFilter(s.to_string()))
    }
}

/// Returns the tasks matching `search` and `filter`, preserving input order.
///
/// A non-empty `search` keeps tasks whose name contains it, compared
/// case-insensitively. The search string is not trimmed, so whitespace is
/// matched literally. The filter is applied after the search.
#[must_use]
pub fn filter_tasks(tasks: &[Task], filter: Filter, search: &str) -> Vec<Task> {
    let needle = search.to_lowercase();
    tasks
        .iter()
        .filter(|task| needle.is_empty() || task.name.to_lowercase().contains(&needle))
        .filter(|task| filter.matches(task))
        .cloned()
        .collect()
}
