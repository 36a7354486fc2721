//! Client-side application state.
//!
//! The [`Store`] is the single owner of the task collection, the active
//! filter and search term, the session user, and the active page. Views read
//! immutable [`AppState`] snapshots and write only by dispatching an
//! [`Action`]; the filtered view is recomputed inside every transition that
//! touches one of its inputs.

pub mod action;
pub mod filter;
pub mod store;

pub use action::{Action, reduce};
pub use filter::{Filter, filter_tasks};
pub use store::{Store, SubscriptionId, Transition};

use projectflow_proto::task::{Task, TaskId};

/// Top-level page selected by navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// Task statistics and recent tasks.
    #[default]
    Dashboard,
    /// Filterable task list.
    Tasks,
    /// About page.
    About,
    /// Demo sign-in form.
    Login,
    /// Demo sign-up form.
    Signup,
    /// Signed-in user's profile.
    Profile,
}

impl Page {
    /// Pages reachable from the main navigation, in display order.
    pub const NAVIGATION: [Self; 3] = [Self::Dashboard, Self::Tasks, Self::About];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tasks => "Tasks",
            Self::About => "About",
            Self::Login => "Login",
            Self::Signup => "Sign Up",
            Self::Profile => "Profile",
        }
    }
}

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Opaque identity.
    pub id: String,
}

/// Snapshot of everything the store owns.
///
/// `filtered_tasks` is always `filter_tasks(&tasks, filter, &search_term)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    /// Canonical task collection, in load/append order.
    pub tasks: Vec<Task>,
    /// Tasks matching the active filter and search term.
    pub filtered_tasks: Vec<Task>,
    /// True while a gateway call is in flight.
    pub loading: bool,
    /// Last task load error, if the most recent fetch failed.
    pub error: Option<String>,
    /// Active filter selection.
    pub filter: Filter,
    /// Case-insensitive name search.
    pub search_term: String,
    /// Page the view layer renders.
    pub active_page: Page,
    /// Signed-in user, if any.
    pub user: Option<User>,
}

impl AppState {
    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Looks up a task by identifier.
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub(crate) fn refresh_filtered(&mut self) {
        self.filtered_tasks = filter_tasks(&self.tasks, self.filter, &self.search_term);
    }
}
