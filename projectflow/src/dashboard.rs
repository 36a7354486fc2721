//! Dashboard statistics derived from the task collection.

use chrono::NaiveDate;

use projectflow_proto::task::{Priority, Task};

/// Summary figures shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Open tasks with high priority.
    pub high_priority: usize,
    /// Completed share in whole percent, rounded; zero with no tasks.
    pub completion_rate: u8,
    /// Open tasks whose due date lies before today.
    pub overdue: usize,
    /// Most recently created tasks, newest first.
    pub recent: Vec<Task>,
}

impl DashboardStats {
    /// Computes statistics for `tasks` as of `today`, keeping at most
    /// `recent_limit` recent tasks. `tasks` itself is not reordered.
    #[must_use]
    pub fn compute(tasks: &[Task], today: NaiveDate, recent_limit: usize) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.done).count();
        let high_priority = tasks
            .iter()
            .filter(|t| !t.done && t.priority == Priority::High)
            .count();
        let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();

        let mut recent = tasks.to_vec();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        recent.truncate(recent_limit);

        Self {
            total,
            completed,
            pending: total - completed,
            high_priority,
            completion_rate: completion_rate(completed, total),
            overdue,
            recent,
        }
    }
}

fn completion_rate(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // Round half up in integer arithmetic.
    let percent = (completed * 200 + total) / (total * 2);
    u8::try_from(percent).unwrap_or(100)
}
