//! `ProjectFlow`: terminal task manager.
//!
//! Launches the TUI over an in-process task backend seeded with sample
//! tasks or a JSON task list. Configuration via CLI flags, environment
//! variables, or config file (`~/.config/projectflow/config.toml`).
//!
//! ```bash
//! # Sample tasks
//! cargo run --bin projectflow
//!
//! # Start from a task list, with a slow backend
//! cargo run --bin projectflow -- --seed-file tasks.json --latency-ms 400
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use projectflow::app::{App, Command};
use projectflow::config::{CliArgs, ClientConfig};
use projectflow::gateway::memory::InMemoryGateway;
use projectflow::notify::{ChannelNotifier, Notification, TracingNotifier};
use projectflow::session::SessionService;
use projectflow::state::Store;
use projectflow::tasks::{PendingConfirmation, TaskService};
use projectflow::ui;

/// Toasts go to the view; the log keeps a copy after they expire.
type Service = TaskService<InMemoryGateway, (ChannelNotifier, TracingNotifier)>;

/// Capacity of the notification channel between services and the view.
const NOTIFICATION_BUFFER: usize = 64;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("projectflow starting");

    let gateway = build_gateway(&config);

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, gateway, &config).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("projectflow exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("projectflow.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_env("PROJECTFLOW_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Build the task backend from the seed settings.
///
/// An unreadable seed file is reported and replaced by an empty backend.
fn build_gateway(config: &ClientConfig) -> InMemoryGateway {
    let gateway = match &config.seed_file {
        Some(path) => InMemoryGateway::from_seed_file(path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "seed file ignored");
            eprintln!("Warning: {e}");
            InMemoryGateway::new()
        }),
        None if config.seed_demo_tasks => InMemoryGateway::demo(),
        None => InMemoryGateway::new(),
    };
    gateway.with_latency(config.latency)
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    gateway: InMemoryGateway,
    config: &ClientConfig,
) -> io::Result<()> {
    let store = Arc::new(Store::new());
    let (notifier, mut notifications) = ChannelNotifier::new(NOTIFICATION_BUFFER);
    let service: Arc<Service> = Arc::new(TaskService::new(
        gateway,
        Arc::clone(&store),
        (notifier, TracingNotifier),
    ));
    let session = SessionService::new(Arc::clone(&store));

    let mut app = App::new(Arc::clone(&store))
        .with_toast_timeout(config.toast_timeout)
        .with_recent_limit(config.recent_tasks_limit);

    // Every state change marks the frame stale.
    let stale = Arc::new(AtomicBool::new(true));
    let marker = Arc::clone(&stale);
    let redraw = store.subscribe(move |_| marker.store(true, Ordering::Release));

    // Initial fetch; failures land in the store's error slot.
    let loader = Arc::clone(&service);
    tokio::spawn(async move {
        let _ = loader.load_tasks().await;
    });

    loop {
        // Step 1: Drain pending notifications (non-blocking).
        let toasts_changed = drain_notifications(&mut app, &mut notifications);
        let toasts_expired = app.expire_toasts(Instant::now());

        // Step 2: Redraw if the store or the view changed since the last frame.
        if stale.swap(false, Ordering::AcqRel) || toasts_changed || toasts_expired {
            terminal.draw(|frame| ui::draw(frame, &app))?;
        }

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    // Keys may change view-local state without touching the store.
                    stale.store(true, Ordering::Release);
                    if let Some(command) = app.handle_key_event(key) {
                        execute_command(&mut app, &service, &session, command);
                    }
                }
                Event::Resize(..) => stale.store(true, Ordering::Release),
                _ => {}
            }
        }

        if app.should_quit {
            store.unsubscribe(redraw);
            return Ok(());
        }
    }
}

/// Move queued notifications onto the screen. Returns whether any arrived.
fn drain_notifications(app: &mut App, rx: &mut mpsc::Receiver<Notification>) -> bool {
    let mut arrived = false;
    while let Ok(notification) = rx.try_recv() {
        app.push_toast(notification);
        arrived = true;
    }
    arrived
}

/// Carry out a command from the view.
///
/// Gateway-bound operations run on their own task; their outcome reaches
/// the view through the store and the notification channel.
fn execute_command(
    app: &mut App,
    service: &Arc<Service>,
    session: &SessionService,
    command: Command,
) {
    let service = Arc::clone(service);
    match command {
        Command::CreateTask(draft) => {
            tokio::spawn(async move {
                let _ = service.create_task(&draft).await;
            });
        }
        Command::EditTask(id, draft) => {
            tokio::spawn(async move {
                let _ = service.edit_task(&id, &draft).await;
            });
        }
        Command::ToggleTask(task) => {
            tokio::spawn(async move {
                let _ = service.toggle_task_completion(&task).await;
            });
        }
        Command::RequestRemoval(id) => app.ask(service.remove_task(id).into()),
        Command::RequestBulkRemoval(ids) => app.ask(service.bulk_delete_tasks(ids).into()),
        Command::Resolve(pending, decision) => {
            tokio::spawn(async move {
                match pending {
                    PendingConfirmation::Single(p) => {
                        let _ = service.confirm_removal(p, decision).await;
                    }
                    PendingConfirmation::Bulk(p) => {
                        let _ = service.confirm_bulk_removal(p, decision).await;
                    }
                }
            });
        }
        Command::Refresh => {
            tokio::spawn(async move {
                let _ = service.refresh_tasks().await;
            });
        }
        Command::Login(form) => match session.login(&form) {
            Ok(_) => app.close_form(),
            Err(errors) => app.form_rejected(&errors),
        },
        Command::Signup(form) => match session.signup(&form) {
            Ok(_) => app.close_form(),
            Err(errors) => app.form_rejected(&errors),
        },
        Command::Logout => session.logout(),
    }
}
