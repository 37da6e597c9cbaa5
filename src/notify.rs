//! Transient user notifications (toasts).
//!
//! DESIGN
//! ======
//! The controller reports every resolved attempt through the [`Notifier`]
//! trait. [`ToastQueue`] keeps notifications in memory and drops them once
//! their TTL elapses; [`TracingNotifier`] writes them to the log instead.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Error,
}

impl Level {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub message: String,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Notification {
    #[must_use]
    pub fn new(level: Level, message: impl Into<String>, ttl: Duration) -> Self {
        Self { id: Uuid::new_v4(), level, message: message.into(), created_at: Instant::now(), ttl }
    }

    #[must_use]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= self.ttl
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

// =============================================================================
// TOAST QUEUE
// =============================================================================

/// In-memory, auto-dismissing notification list.
#[derive(Debug, Default)]
pub struct ToastQueue {
    toasts: Mutex<VecDeque<Notification>>,
}

impl ToastQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification, dropping any that have already expired.
    pub fn push(&self, notification: Notification) {
        let now = Instant::now();
        let mut toasts = self.guard();
        toasts.retain(|n| !n.is_expired_at(now));
        toasts.push_back(notification);
    }

    /// Live notifications, oldest first. Expired ones are removed.
    #[must_use]
    pub fn active(&self) -> Vec<Notification> {
        self.active_at(Instant::now())
    }

    #[must_use]
    pub fn active_at(&self, now: Instant) -> Vec<Notification> {
        let mut toasts = self.guard();
        toasts.retain(|n| !n.is_expired_at(now));
        toasts.iter().cloned().collect()
    }

    /// Dismiss one notification early. Returns `false` if it was already gone.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut toasts = self.guard();
        let before = toasts.len();
        toasts.retain(|n| n.id != id);
        toasts.len() != before
    }

    /// Number of stored notifications, expired or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, VecDeque<Notification>> {
        self.toasts.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Notifier for ToastQueue {
    fn notify(&self, notification: Notification) {
        self.push(notification);
    }
}

// =============================================================================
// TRACING NOTIFIER
// =============================================================================

/// Notifier for headless contexts: every notification becomes a log event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        let level = notification.level.as_str();
        match notification.level {
            Level::Error => tracing::warn!(level, message = %notification.message, "notification"),
            Level::Info | Level::Success => tracing::info!(level, message = %notification.message, "notification"),
        }
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
