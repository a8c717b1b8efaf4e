//! `medrem-reminders`
//!
//! **Responsibility:** the medication inventory engine.
//!
//! [`ReminderBook`] owns the record collection and runs every transition on
//! it; [`ReminderScheduler`] drives the periodic reminder scan.

pub mod book;
pub mod config;
pub mod scheduler;

pub use book::{ReminderBook, StatusChange, StatusGroups, Summary, compute_low_stock_set};
pub use config::{ConfigError, EngineConfig};
pub use scheduler::{Clock, ManualClock, ReminderScheduler, SchedulerHandle, SystemClock};
