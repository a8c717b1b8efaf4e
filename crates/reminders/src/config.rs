//! Engine configuration.
//!
//! Read once at startup from environment variables; every value has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use medrem_medication::{InsufficientStockPolicy, LowStockRule};

pub const ENV_REMINDER_WINDOW: &str = "MEDREM_REMINDER_WINDOW_MINUTES";
pub const ENV_POLL_INTERVAL: &str = "MEDREM_POLL_INTERVAL_SECS";
pub const ENV_INSUFFICIENT_STOCK: &str = "MEDREM_INSUFFICIENT_STOCK";
pub const ENV_LOW_STOCK_RULE: &str = "MEDREM_LOW_STOCK_RULE";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} (expected {expected})")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Minutes either side of a reminder time during which it counts as due.
    pub reminder_window_minutes: u32,
    /// How often the scheduler scans for due reminders.
    pub poll_interval: Duration,
    pub insufficient_stock: InsufficientStockPolicy,
    /// Rule used for the aggregate low-stock banner.
    pub low_stock_rule: LowStockRule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reminder_window_minutes: 1,
            poll_interval: Duration::from_secs(60),
            insufficient_stock: InsufficientStockPolicy::MarkTaken,
            low_stock_rule: LowStockRule::Doses,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (environment, test map, ...).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_REMINDER_WINDOW) {
            config.reminder_window_minutes =
                raw.trim().parse().map_err(|_| invalid(ENV_REMINDER_WINDOW, &raw, "minutes"))?;
        }

        if let Some(raw) = lookup(ENV_POLL_INTERVAL) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| invalid(ENV_POLL_INTERVAL, &raw, "a positive number of seconds"))?;
            config.poll_interval = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup(ENV_INSUFFICIENT_STOCK) {
            config.insufficient_stock = InsufficientStockPolicy::parse(&raw)
                .ok_or_else(|| invalid(ENV_INSUFFICIENT_STOCK, &raw, "mark-taken|refuse"))?;
        }

        if let Some(raw) = lookup(ENV_LOW_STOCK_RULE) {
            config.low_stock_rule = LowStockRule::parse(&raw)
                .ok_or_else(|| invalid(ENV_LOW_STOCK_RULE, &raw, "doses|quantity"))?;
        }

        Ok(config)
    }

    pub fn with_reminder_window(mut self, minutes: u32) -> Self {
        self.reminder_window_minutes = minutes;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_insufficient_stock(mut self, policy: InsufficientStockPolicy) -> Self {
        self.insufficient_stock = policy;
        self
    }

    pub fn with_low_stock_rule(mut self, rule: LowStockRule) -> Self {
        self.low_stock_rule = rule;
        self
    }
}

fn invalid(key: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        expected,
    }
}
