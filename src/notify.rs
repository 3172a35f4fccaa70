//! Notification Surface
//!
//! Success and failure banners. Coordinators only see the [`Notifier`] trait;
//! [`AlertPanel`] is the in-memory implementation backing a page.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Fire-and-forget sink for user-facing banners.
pub trait Notifier: Send + Sync {
    fn notify_success(&self, title: &str, message: &str);

    fn notify_failure(&self, title: &str, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    pub visible: bool,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Default)]
struct AlertState {
    success: Banner,
    failure: Banner,
    history: Vec<Notification>,
}

/// Two mutually exclusive banners: showing one hides the other.
#[derive(Debug, Default)]
pub struct AlertPanel {
    state: Mutex<AlertState>,
}

impl AlertPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_banner(&self) -> Banner {
        self.state.lock().success.clone()
    }

    pub fn failure_banner(&self) -> Banner {
        self.state.lock().failure.clone()
    }

    pub fn close_success(&self) {
        self.state.lock().success.visible = false;
    }

    pub fn close_failure(&self) {
        self.state.lock().failure.visible = false;
    }

    /// Every notification shown so far, oldest first.
    pub fn history(&self) -> Vec<Notification> {
        self.state.lock().history.clone()
    }

    pub fn count(&self, kind: NotificationKind) -> usize {
        self.state
            .lock()
            .history
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    fn show(&self, kind: NotificationKind, title: &str, message: &str) {
        let mut state = self.state.lock();
        let (shown, hidden) = match kind {
            NotificationKind::Success => {
                let AlertState {
                    success, failure, ..
                } = &mut *state;
                (success, failure)
            }
            NotificationKind::Failure => {
                let AlertState {
                    success, failure, ..
                } = &mut *state;
                (failure, success)
            }
        };
        *shown = Banner {
            visible: true,
            title: title.to_string(),
            message: message.to_string(),
        };
        hidden.visible = false;

        state.history.push(Notification {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            at: Utc::now(),
        });
    }
}

impl Notifier for AlertPanel {
    fn notify_success(&self, title: &str, message: &str) {
        self.show(NotificationKind::Success, title, message);
    }

    fn notify_failure(&self, title: &str, message: &str) {
        self.show(NotificationKind::Failure, title, message);
    }
}
