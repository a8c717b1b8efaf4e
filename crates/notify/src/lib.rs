//! `medrem-notify`
//!
//! **Responsibility:** best-effort delivery of reminder notifications.
//!
//! Delivery never feeds back into engine state: `Notifier::send` reports
//! whether something was shown and nothing else.

pub mod backend;
pub mod notifier;
pub mod permission;

pub use backend::{LogBackend, NotificationBackend, NotifyError};
pub use notifier::{Delivered, GatedNotifier, MemoryNotifier, Notifier};
pub use permission::{Permission, PermissionOutcome};
