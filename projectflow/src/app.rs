//! View state and key handling for the terminal UI.
//!
//! [`App`] holds only what the view layer owns: the input mode, the list
//! cursor, marked tasks, open forms, and toasts. Everything else is read
//! from the [`Store`] snapshot at draw time. Key handling returns a
//! [`Command`] when the intent needs a service call; navigation, filter
//! and search changes are dispatched straight to the store.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use projectflow_proto::task::{Priority, Task, TaskDraft, TaskId};

use crate::notify::Notification;
use crate::session::{LoginForm, SignupForm, ValidationError};
use crate::state::{Action, AppState, Page, Store};
use crate::tasks::{Decision, PendingConfirmation};

/// Date format used by the due date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// An intent that needs a service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateTask(TaskDraft),
    EditTask(TaskId, TaskDraft),
    ToggleTask(Task),
    /// Ask for confirmation before deleting one task.
    RequestRemoval(TaskId),
    /// Ask for confirmation before deleting several tasks.
    RequestBulkRemoval(Vec<TaskId>),
    /// The user answered a confirmation prompt.
    Resolve(PendingConfirmation, Decision),
    Refresh,
    Login(LoginForm),
    Signup(SignupForm),
    Logout,
}

/// What a form submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    NewTask,
    EditTask(Task),
    Login,
    Signup,
}

/// One text input in a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Rendered masked.
    pub secret: bool,
}

impl FormField {
    fn text(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: true,
        }
    }
}

/// An open form.
///
/// Task forms carry a priority selector after the text fields; it has
/// focus when `focus == fields.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub priority: Option<Priority>,
    pub focus: usize,
    /// Errors from the last submit attempt.
    pub errors: Vec<String>,
}

impl Form {
    /// Empty task creation form.
    #[must_use]
    pub fn new_task() -> Self {
        Self::task_form(FormKind::NewTask, "", "", "", Priority::default())
    }

    /// Task edit form pre-filled from `task`.
    #[must_use]
    pub fn edit_task(task: &Task) -> Self {
        let due = task
            .due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        Self::task_form(
            FormKind::EditTask(task.clone()),
            &task.name,
            &task.description,
            &due,
            task.priority,
        )
    }

    /// Sign-in form.
    #[must_use]
    pub fn login() -> Self {
        Self::with_fields(
            FormKind::Login,
            vec![FormField::text("Email", ""), FormField::secret("Password")],
            None,
        )
    }

    /// Sign-up form.
    #[must_use]
    pub fn signup() -> Self {
        Self::with_fields(
            FormKind::Signup,
            vec![
                FormField::text("Full name", ""),
                FormField::text("Username", ""),
                FormField::text("Email", ""),
                FormField::text("Phone (optional)", ""),
                FormField::secret("Password"),
                FormField::secret("Confirm password"),
            ],
            None,
        )
    }

    fn task_form(
        kind: FormKind,
        name: &str,
        description: &str,
        due: &str,
        priority: Priority,
    ) -> Self {
        Self::with_fields(
            kind,
            vec![
                FormField::text("Name", name),
                FormField::text("Description", description),
                FormField::text("Due date (YYYY-MM-DD)", due),
            ],
            Some(priority),
        )
    }

    const fn with_fields(
        kind: FormKind,
        fields: Vec<FormField>,
        priority: Option<Priority>,
    ) -> Self {
        Self {
            kind,
            fields,
            priority,
            focus: 0,
            errors: Vec::new(),
        }
    }

    /// Form title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.kind {
            FormKind::NewTask => "New Task",
            FormKind::EditTask(_) => "Edit Task",
            FormKind::Login => "Sign In",
            FormKind::Signup => "Sign Up",
        }
    }

    fn focus_slots(&self) -> usize {
        self.fields.len() + usize::from(self.priority.is_some())
    }

    fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.focus_slots();
    }

    fn focus_prev(&mut self) {
        let slots = self.focus_slots();
        self.focus = (self.focus + slots - 1) % slots;
    }

    /// Whether the priority selector has focus.
    #[must_use]
    pub fn priority_focused(&self) -> bool {
        self.priority.is_some() && self.focus == self.fields.len()
    }

    fn value(&self, idx: usize) -> &str {
        self.fields.get(idx).map_or("", |f| f.value.as_str())
    }

    fn edit(&mut self, key: KeyCode) {
        if self.priority_focused() {
            if matches!(key, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                self.priority = self.priority.map(Priority::next);
            }
            return;
        }
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match key {
            KeyCode::Char(c) => field.value.push(c),
            KeyCode::Backspace => {
                field.value.pop();
            }
            _ => {}
        }
    }

    /// Turns the form into a command, or returns the messages to show.
    ///
    /// Task forms are validated here; sign-in and sign-up are validated by
    /// the session service.
    ///
    /// # Errors
    ///
    /// Returns user-facing messages if a task form is invalid.
    pub fn submit(&self, today: NaiveDate) -> Result<Command, Vec<String>> {
        match &self.kind {
            FormKind::NewTask => Ok(Command::CreateTask(self.task_draft(today, false)?)),
            FormKind::EditTask(task) => Ok(Command::EditTask(
                task.id.clone(),
                self.task_draft(today, task.done)?,
            )),
            FormKind::Login => Ok(Command::Login(LoginForm {
                email: self.value(0).to_string(),
                password: self.value(1).to_string(),
            })),
            FormKind::Signup => Ok(Command::Signup(SignupForm {
                full_name: self.value(0).to_string(),
                username: self.value(1).to_string(),
                email: self.value(2).to_string(),
                phone: self.value(3).to_string(),
                password: self.value(4).to_string(),
                confirm_password: self.value(5).to_string(),
            })),
        }
    }

    fn task_draft(&self, today: NaiveDate, done: bool) -> Result<TaskDraft, Vec<String>> {
        let due_text = self.value(2).trim();
        let due_date = if due_text.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(due_text, DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(_) => return Err(vec!["Due date must be YYYY-MM-DD".to_string()]),
            }
        };
        let draft = TaskDraft::new(self.value(0))
            .with_description(self.value(1))
            .with_priority(self.priority.unwrap_or_default())
            .with_due_date(due_date)
            .with_done(done)
            .normalized();
        draft
            .validate(today)
            .map_err(|errors| errors.iter().map(ToString::to_string).collect::<Vec<_>>())?;
        Ok(draft)
    }
}

/// Input mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing into the search box.
    Search,
    Form(Form),
    /// A deletion is waiting for y/n.
    Confirm(PendingConfirmation),
}

/// A notification on screen.
#[derive(Debug, Clone)]
pub struct Toast {
    pub notification: Notification,
    shown_at: Instant,
}

/// View-layer state.
pub struct App {
    store: Arc<Store>,
    /// Current input mode.
    pub mode: Mode,
    /// Cursor into the filtered task list.
    pub selected: usize,
    /// Tasks marked for bulk deletion.
    pub marked: HashSet<TaskId>,
    toasts: Vec<Toast>,
    toast_timeout: Duration,
    /// Recent tasks listed on the dashboard.
    pub recent_limit: usize,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates the view over `store`.
    #[must_use]
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            mode: Mode::Normal,
            selected: 0,
            marked: HashSet::new(),
            toasts: Vec::new(),
            toast_timeout: Duration::from_secs(3),
            recent_limit: 5,
            should_quit: false,
        }
    }

    /// Sets how long toasts stay visible.
    #[must_use]
    pub const fn with_toast_timeout(mut self, timeout: Duration) -> Self {
        self.toast_timeout = timeout;
        self
    }

    /// Sets how many recent tasks the dashboard lists.
    #[must_use]
    pub const fn with_recent_limit(mut self, limit: usize) -> Self {
        self.recent_limit = limit;
        self
    }

    /// Current store snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<AppState> {
        self.store.snapshot()
    }

    /// Visible toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Shows a notification.
    pub fn push_toast(&mut self, notification: Notification) {
        self.toasts.push(Toast {
            notification,
            shown_at: Instant::now(),
        });
    }

    /// Drops toasts older than the toast timeout. Returns whether any went.
    pub fn expire_toasts(&mut self, now: Instant) -> bool {
        let timeout = self.toast_timeout;
        let before = self.toasts.len();
        self.toasts
            .retain(|t| now.saturating_duration_since(t.shown_at) < timeout);
        self.toasts.len() != before
    }

    /// Puts a confirmation prompt in front of the user.
    pub fn ask(&mut self, pending: PendingConfirmation) {
        self.mode = Mode::Confirm(pending);
    }

    /// Shows `errors` on the open form.
    pub fn form_rejected(&mut self, errors: &[ValidationError]) {
        if let Mode::Form(form) = &mut self.mode {
            form.errors = errors.iter().map(ToString::to_string).collect();
        }
    }

    /// Closes the open form.
    pub fn close_form(&mut self) {
        if matches!(self.mode, Mode::Form(_)) {
            self.mode = Mode::Normal;
        }
    }

    /// The task under the cursor.
    #[must_use]
    pub fn selected_task(&self) -> Option<Task> {
        let state = self.state();
        let last = state.filtered_tasks.len().checked_sub(1)?;
        state.filtered_tasks.get(self.selected.min(last)).cloned()
    }

    /// Handles a key press. Returns a command when the intent needs a
    /// service call.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return None;
        }

        match std::mem::take(&mut self.mode) {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Search => {
                self.handle_search_key(key);
                None
            }
            Mode::Form(form) => self.handle_form_key(form, key),
            Mode::Confirm(pending) => self.handle_confirm_key(pending, key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<Command> {
        let state = self.state();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => self.navigate(1),
            KeyCode::BackTab => self.navigate(Page::NAVIGATION.len() - 1),
            KeyCode::Char('1') => self.go_to(Page::Dashboard),
            KeyCode::Char('2') => self.go_to(Page::Tasks),
            KeyCode::Char('3') => self.go_to(Page::About),
            KeyCode::Char('r') => return Some(Command::Refresh),
            KeyCode::Char('n') => self.mode = Mode::Form(Form::new_task()),
            KeyCode::Char('l') if !state.is_authenticated() => {
                self.go_to(Page::Login);
                self.mode = Mode::Form(Form::login());
            }
            KeyCode::Char('u') if !state.is_authenticated() => {
                self.go_to(Page::Signup);
                self.mode = Mode::Form(Form::signup());
            }
            KeyCode::Char('p') if state.is_authenticated() => self.go_to(Page::Profile),
            KeyCode::Char('o') if state.is_authenticated() => return Some(Command::Logout),
            _ if state.active_page == Page::Tasks => return self.handle_task_list_key(key, &state),
            _ => {}
        }
        None
    }

    fn handle_task_list_key(&mut self, key: KeyEvent, state: &AppState) -> Option<Command> {
        let len = state.filtered_tasks.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1).min(len.saturating_sub(1));
            }
            KeyCode::Char('f') => {
                self.store.dispatch(Action::SetFilter(state.filter.next()));
                self.selected = 0;
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('c') => {
                self.store.dispatch(Action::SetSearch(String::new()));
                self.marked.clear();
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.selected_task()
                    && !self.marked.remove(&task.id)
                {
                    self.marked.insert(task.id);
                }
            }
            KeyCode::Enter | KeyCode::Char('x') => {
                return self.selected_task().map(Command::ToggleTask);
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::Form(Form::edit_task(&task));
                }
            }
            KeyCode::Char('d') => return self.request_deletion(state),
            _ => {}
        }
        None
    }

    fn request_deletion(&mut self, state: &AppState) -> Option<Command> {
        if self.marked.is_empty() {
            return self
                .selected_task()
                .map(|task| Command::RequestRemoval(task.id));
        }
        let ids: Vec<TaskId> = state
            .tasks
            .iter()
            .filter(|t| self.marked.contains(&t.id))
            .map(|t| t.id.clone())
            .collect();
        self.marked.clear();
        if ids.is_empty() {
            None
        } else {
            Some(Command::RequestBulkRemoval(ids))
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        let mut term = self.state().search_term.clone();
        match key.code {
            KeyCode::Enter | KeyCode::Esc => return,
            KeyCode::Char(c) => term.push(c),
            KeyCode::Backspace => {
                term.pop();
            }
            _ => {}
        }
        self.store.dispatch(Action::SetSearch(term));
        self.selected = 0;
        self.mode = Mode::Search;
    }

    fn handle_form_key(&mut self, mut form: Form, key: KeyEvent) -> Option<Command> {
        match key.code {
            KeyCode::Esc => {
                if matches!(form.kind, FormKind::Login | FormKind::Signup) {
                    self.go_to(Page::Dashboard);
                }
                return None;
            }
            KeyCode::Tab | KeyCode::Down => form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
            KeyCode::Enter => {
                let today = chrono::Local::now().date_naive();
                match form.submit(today) {
                    Ok(command) => {
                        // Auth forms stay open until the session answers.
                        if matches!(command, Command::Login(_) | Command::Signup(_)) {
                            form.errors.clear();
                            self.mode = Mode::Form(form);
                        }
                        return Some(command);
                    }
                    Err(errors) => form.errors = errors,
                }
            }
            code => form.edit(code),
        }
        self.mode = Mode::Form(form);
        None
    }

    fn handle_confirm_key(
        &mut self,
        pending: PendingConfirmation,
        key: KeyEvent,
    ) -> Option<Command> {
        let decision = match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Decision::Confirm,
            KeyCode::Char('n' | 'N') | KeyCode::Esc => Decision::Cancel,
            _ => {
                self.mode = Mode::Confirm(pending);
                return None;
            }
        };
        Some(Command::Resolve(pending, decision))
    }

    fn navigate(&self, step: usize) {
        let current = self.state().active_page;
        let idx = Page::NAVIGATION
            .iter()
            .position(|p| *p == current)
            .map_or(0, |i| (i + step) % Page::NAVIGATION.len());
        self.go_to(Page::NAVIGATION[idx]);
    }

    fn go_to(&self, page: Page) {
        self.store.dispatch(Action::SetActivePage(page));
    }
}
