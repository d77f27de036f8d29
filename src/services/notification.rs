use crate::models::{Notification, NotificationPosition, NotificationType};
use log::{info, warn};
use std::time::{Duration, Instant};
use tokio::sync::watch;

#[derive(Clone, Debug)]
struct Shown {
    notification: Notification,
    at: Instant,
}

/// Holds the toast currently on screen. A new push replaces the old one.
pub struct NotificationService {
    default_duration: Duration,
    position: NotificationPosition,
    current: watch::Sender<Option<Shown>>,
}

impl NotificationService {
    pub fn new(default_duration: Duration, position: NotificationPosition) -> Self {
        let (current, _) = watch::channel(None);
        NotificationService {
            default_duration,
            position,
            current,
        }
    }

    pub fn push(
        &self,
        message: impl Into<String>,
        kind: NotificationType,
        position: NotificationPosition,
        duration: Duration,
    ) {
        let notification = Notification {
            message: message.into(),
            kind,
            position,
            duration,
        };
        match kind {
            NotificationType::Error => warn!("event=notification kind=error message={}", notification),
            _ => info!("event=notification kind={:?} message={}", kind, notification),
        }
        self.current.send_replace(Some(Shown {
            notification,
            at: Instant::now(),
        }));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(
            message,
            NotificationType::Success,
            self.position,
            self.default_duration,
        );
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(
            message,
            NotificationType::Error,
            self.position,
            self.default_duration,
        );
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.push(
            message,
            NotificationType::Warning,
            self.position,
            self.default_duration,
        );
    }

    /// The live toast, or `None` once its duration has elapsed.
    pub fn current(&self) -> Option<Notification> {
        self.current_at(Instant::now())
    }

    pub fn current_at(&self, now: Instant) -> Option<Notification> {
        let shown = self.current.borrow();
        shown
            .as_ref()
            .filter(|s| now.saturating_duration_since(s.at) < s.notification.duration)
            .map(|s| s.notification.clone())
    }

    pub fn dismiss(&self) {
        self.current.send_replace(None);
    }
}
