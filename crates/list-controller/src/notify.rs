//! # Notifications
//!
//! Outcomes the user should hear about (the console shows them as toasts). Presentation
//! is an external concern; the controller only hands a [`Notification`] to whatever
//! [`Notifier`] it was built with.

use crate::guard::MutationKind;
use std::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Saved {
        resource: String,
        kind: MutationKind,
    },
    Deleted {
        resource: String,
    },
    MutationFailed {
        resource: String,
        kind: MutationKind,
        message: String,
    },
    FetchFailed {
        resource: String,
        message: String,
    },
}

impl Notification {
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notification::MutationFailed { .. } | Notification::FetchFailed { .. }
        )
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log. The default when no notifier is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match &notification {
            Notification::Saved { resource, kind } => info!(%resource, %kind, "Saved"),
            Notification::Deleted { resource } => info!(%resource, "Deleted"),
            Notification::MutationFailed {
                resource,
                kind,
                message,
            } => warn!(%resource, %kind, error = %message, "Mutation failed"),
            Notification::FetchFailed { resource, message } => {
                warn!(%resource, error = %message, "Fetch failed")
            }
        }
    }
}

/// Keeps every notification in memory, for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        let mut seen = self.seen.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        seen.push(notification);
    }
}
