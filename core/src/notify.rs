//! Notification sink and the toast queue behind it.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// How long a toast stays up before `prune_expired` takes it down.
pub const AUTO_HIDE: Duration = Duration::from_millis(5000);

/// Receives human-readable error messages. Fire-and-forget.
pub trait NotificationSink {
    fn notify(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub shown_at: Instant,
}

#[derive(Debug, Default)]
struct Toasts {
    next_id: u64,
    visible: Vec<Toast>,
}

/// Stack of visible toasts. Clones share the same stack.
///
/// Toasts leave the stack through `dismiss` or, once older than the queue's
/// lifetime, through `prune_expired`. The host drives the clock.
#[derive(Debug, Clone)]
pub struct ToastQueue {
    inner: Arc<Mutex<Toasts>>,
    lifetime: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::with_lifetime(AUTO_HIDE)
    }
}

impl ToastQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            inner: Arc::default(),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Push a toast and return its id.
    pub fn show(&self, message: &str, severity: Severity) -> u64 {
        let mut toasts = self.lock();
        toasts.next_id += 1;
        let id = toasts.next_id;
        toasts.visible.push(Toast {
            id,
            message: message.to_string(),
            severity,
            shown_at: Instant::now(),
        });
        id
    }

    pub fn show_error(&self, message: &str) -> u64 {
        self.show(message, Severity::Error)
    }

    pub fn show_success(&self, message: &str) -> u64 {
        self.show(message, Severity::Success)
    }

    /// Remove a toast. Returns false if it was already gone.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut toasts = self.lock();
        let before = toasts.visible.len();
        toasts.visible.retain(|t| t.id != id);
        toasts.visible.len() != before
    }

    /// Drop every toast shown at least `lifetime` before `now`. Returns how
    /// many were dropped.
    pub fn prune_expired(&self, now: Instant) -> usize {
        let lifetime = self.lifetime;
        let mut toasts = self.lock();
        let before = toasts.visible.len();
        toasts
            .visible
            .retain(|t| now.saturating_duration_since(t.shown_at) < lifetime);
        before - toasts.visible.len()
    }

    /// Visible toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.lock().visible.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Toasts> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NotificationSink for ToastQueue {
    fn notify(&self, message: &str) {
        tracing::info!(message, "showing error toast");
        self.show_error(message);
    }
}
