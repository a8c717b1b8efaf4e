//! Process configuration for the shell.

use medrem_notify::Permission;
use medrem_reminders::{ConfigError, EngineConfig};

pub const ENV_NOTIFICATIONS: &str = "MEDREM_NOTIFICATIONS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub engine: EngineConfig,
    /// Notification permission at startup.
    pub notifications: Permission,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let engine = EngineConfig::from_lookup(&lookup)?;
        let notifications = match lookup(ENV_NOTIFICATIONS) {
            None => Permission::Default,
            Some(raw) => Permission::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                key: ENV_NOTIFICATIONS,
                value: raw.clone(),
                expected: "granted|denied|default",
            })?,
        };
        Ok(Self {
            engine,
            notifications,
        })
    }
}
