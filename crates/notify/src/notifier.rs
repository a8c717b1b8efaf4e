//! Notifier implementations.

use std::sync::Mutex;

use crate::backend::NotificationBackend;
use crate::permission::{Permission, PermissionOutcome};

/// Fire-and-forget notification sink used by the engine.
///
/// Returns whether the notification was actually shown. Failures are handled
/// inside the implementation and never surface as errors.
pub trait Notifier: Send + Sync {
    fn send(&self, title: &str, body: &str) -> bool;
}

/// Notifier that only delivers once the user granted permission.
#[derive(Debug)]
pub struct GatedNotifier<B> {
    backend: B,
    permission: Mutex<Permission>,
}

impl<B: NotificationBackend> GatedNotifier<B> {
    pub fn new(backend: B, initial: Permission) -> Self {
        Self {
            backend,
            permission: Mutex::new(initial),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current permission. A poisoned lock reads as `Denied`.
    pub fn permission(&self) -> Permission {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(Permission::Denied)
    }

    /// User-initiated permission request; the only way permission changes.
    pub fn request_permission(&self) -> PermissionOutcome {
        if !self.backend.is_supported() {
            return PermissionOutcome::Unsupported;
        }

        let answer = match self.backend.request_permission() {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "error requesting notification permission");
                return PermissionOutcome::Failed;
            }
        };

        match self.permission.lock() {
            Ok(mut p) => *p = answer,
            Err(_) => return PermissionOutcome::Failed,
        }
        tracing::info!(permission = answer.as_str(), "notification permission updated");

        if answer.is_granted() {
            PermissionOutcome::Enabled
        } else {
            PermissionOutcome::Disabled
        }
    }
}

impl<B: NotificationBackend> Notifier for GatedNotifier<B> {
    fn send(&self, title: &str, body: &str) -> bool {
        if !self.backend.is_supported() || !self.permission().is_granted() {
            tracing::debug!(%title, "notification suppressed");
            return false;
        }
        match self.backend.deliver(title, body) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, %title, "error sending notification");
                false
            }
        }
    }
}

/// A delivered notification, as recorded by [`MemoryNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub title: String,
    pub body: String,
}

/// In-memory notifier for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    delivered: Mutex<Vec<Delivered>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> Vec<Delivered> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }

    pub fn titles(&self) -> Vec<String> {
        self.delivered().into_iter().map(|d| d.title).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut d) = self.delivered.lock() {
            d.clear();
        }
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, title: &str, body: &str) -> bool {
        match self.delivered.lock() {
            Ok(mut d) => {
                d.push(Delivered {
                    title: title.to_string(),
                    body: body.to_string(),
                });
                true
            }
            Err(_) => false,
        }
    }
}
