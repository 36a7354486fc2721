//! State transitions.

use projectflow_proto::task::{Task, TaskId};

use super::store::Transition;
use super::{AppState, Filter, Page, User};

/// Every mutation the store accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the whole task collection (after a fetch).
    LoadTasks(Vec<Task>),
    /// Append a task created by the gateway.
    AddTask(Task),
    /// Replace the task with the same identifier, in place.
    ReplaceTask(Task),
    /// Remove the task with this identifier.
    RemoveTask(TaskId),
    /// Select a filter.
    SetFilter(Filter),
    /// Set the search term.
    SetSearch(String),
    /// Navigate to a page.
    SetActivePage(Page),
    /// Sign a user in, or out with `None`.
    SetUser(Option<User>),
    /// Sign out and return to the dashboard in one step.
    Logout,
    /// Toggle the in-flight indicator.
    SetLoading(bool),
    /// Record or clear the last load error.
    SetError(Option<String>),
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoadTasks(_) => "load_tasks",
            Self::AddTask(_) => "add_task",
            Self::ReplaceTask(_) => "replace_task",
            Self::RemoveTask(_) => "remove_task",
            Self::SetFilter(_) => "set_filter",
            Self::SetSearch(_) => "set_search",
            Self::SetActivePage(_) => "set_active_page",
            Self::SetUser(_) => "set_user",
            Self::Logout => "logout",
            Self::SetLoading(_) => "set_loading",
            Self::SetError(_) => "set_error",
        }
    }
}

/// Applies `action` to `state`.
///
/// Total and synchronous. Replacing or removing an unknown identifier
/// leaves the state untouched and reports [`Transition::Unchanged`].
pub fn reduce(state: &mut AppState, action: Action) -> Transition {
    match action {
        Action::LoadTasks(tasks) => {
            state.tasks = tasks;
            state.refresh_filtered();
        }
        Action::AddTask(task) => {
            state.tasks.push(task);
            state.refresh_filtered();
        }
        Action::ReplaceTask(task) => {
            let Some(slot) = state.tasks.iter_mut().find(|t| t.id == task.id) else {
                return Transition::Unchanged;
            };
            *slot = task;
            state.refresh_filtered();
        }
        Action::RemoveTask(id) => {
            let before = state.tasks.len();
            state.tasks.retain(|t| t.id != id);
            if state.tasks.len() == before {
                return Transition::Unchanged;
            }
            state.refresh_filtered();
        }
        Action::SetFilter(filter) => {
            state.filter = filter;
            state.refresh_filtered();
        }
        Action::SetSearch(term) => {
            state.search_term = term;
            state.refresh_filtered();
        }
        Action::SetActivePage(page) => state.active_page = page,
        Action::SetUser(user) => state.user = user,
        Action::Logout => {
            state.user = None;
            state.active_page = Page::Dashboard;
        }
        Action::SetLoading(loading) => state.loading = loading,
        Action::SetError(error) => state.error = error,
    }
    Transition::Changed
}
