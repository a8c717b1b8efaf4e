//! Platform delivery backends.

use thiserror::Error;

use crate::permission::Permission;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notifications are not supported on this platform")]
    Unsupported,
    #[error("delivery failed: {0}")]
    Delivery(String),
    #[error("permission request failed: {0}")]
    PermissionRequest(String),
}

/// A platform's notification surface.
pub trait NotificationBackend: Send + Sync {
    fn is_supported(&self) -> bool;

    /// Ask the user for permission.
    fn request_permission(&self) -> Result<Permission, NotifyError>;

    fn deliver(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

/// Backend that "shows" notifications as structured log lines.
#[derive(Debug, Clone)]
pub struct LogBackend {
    answer: Permission,
}

impl LogBackend {
    /// `answer` is what a permission request resolves to.
    pub fn new(answer: Permission) -> Self {
        Self { answer }
    }
}

impl Default for LogBackend {
    fn default() -> Self {
        Self::new(Permission::Granted)
    }
}

impl NotificationBackend for LogBackend {
    fn is_supported(&self) -> bool {
        true
    }

    fn request_permission(&self) -> Result<Permission, NotifyError> {
        Ok(self.answer)
    }

    fn deliver(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(target: "medrem::notification", %title, %body, "notification");
        Ok(())
    }
}
