use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// NotificationKind
///
/// Category of a user-facing alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The server answered with an error status.
    Server,
    /// No response arrived.
    Network,
    /// The request could not be built.
    Configuration,
    /// Wrong admin password.
    Authentication,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Notifier
///
/// Surface for modal alerts. Callers await `alert` before continuing, so an
/// implementation that waits for acknowledgement blocks the caller until the user
/// has seen the message.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn alert(&self, notification: Notification);
}

/// TracingNotifier
///
/// Terminal implementation: logs the alert and prints it to stderr.
#[derive(Clone, Default)]
pub struct TracingNotifier;

#[async_trait]
impl Notifier for TracingNotifier {
    async fn alert(&self, notification: Notification) {
        tracing::warn!(kind = ?notification.kind, "{}", notification.message);
        eprintln!("[!] {}", notification.message);
    }
}

/// RecordingNotifier
///
/// Keeps every alert in memory so tests can assert on what the user would have seen.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn alert(&self, notification: Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification);
        }
    }
}

/// NotifierState
///
/// Shared handle used by the API client and the navigation guard.
pub type NotifierState = Arc<dyn Notifier>;
