//! User-facing notifications.
//!
//! Task operations report their outcome through a [`Notifier`]. Delivery is
//! fire-and-forget: sinks never block the caller and never report failure.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// An operation succeeded.
    Success,
    /// An operation failed.
    Error,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Message text.
    pub message: String,
    /// Severity.
    pub level: Level,
}

impl Notification {
    /// Creates a notification.
    pub fn new(message: impl Into<String>, level: Level) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }
}

/// Sink for user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver `message` at `level`.
    fn notify(&self, message: &str, level: Level);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, message: &str, level: Level) {
        (**self).notify(message, level);
    }
}

/// Delivers to both sinks, first then second.
impl<A: Notifier, B: Notifier> Notifier for (A, B) {
    fn notify(&self, message: &str, level: Level) {
        self.0.notify(message, level);
        self.1.notify(message, level);
    }
}

/// Forwards notifications over a bounded channel to the view layer.
///
/// Uses `try_send`: when the buffer is full or the receiver is gone, the
/// notification is dropped and a warning is logged.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    /// Creates a notifier and the receiver the view layer should drain.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, message: &str, level: Level) {
        if let Err(e) = self.tx.try_send(Notification::new(message, level)) {
            tracing::warn!(%message, error = %e, "notification dropped");
        }
    }
}

/// Writes notifications to the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, level: Level) {
        match level {
            Level::Success => tracing::info!(%message, "notification"),
            Level::Error => tracing::warn!(%message, "notification"),
        }
    }
}

/// Keeps every notification in memory, in call order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().clone()
    }

    /// Recorded notifications at `level`.
    #[must_use]
    pub fn at_level(&self, level: Level) -> Vec<Notification> {
        self.seen
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .cloned()
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&self) {
        self.seen.lock().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, level: Level) {
        self.seen.lock().push(Notification::new(message, level));
    }
}
