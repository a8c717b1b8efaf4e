//! Notification permission state.

use serde::{Deserialize, Serialize};

/// Process-wide notification permission.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// The user has not been asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

impl Permission {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "default" | "unknown" => Some(Self::Default),
            "granted" => Some(Self::Granted),
            "denied" => Some(Self::Denied),
            _ => None,
        }
    }

    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Result of a user-initiated permission request, with the message shown for it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PermissionOutcome {
    Enabled,
    Disabled,
    Failed,
    Unsupported,
}

impl PermissionOutcome {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Enabled => "Notifications enabled",
            Self::Disabled => "Notifications disabled",
            Self::Failed => "Error enabling notifications",
            Self::Unsupported => "Notifications not supported",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Enabled => "You will now receive system notifications for medicine reminders",
            Self::Disabled => "You won't receive system notifications for medicine reminders",
            Self::Failed => "Failed to request notification permission",
            Self::Unsupported => "Your platform does not support system notifications",
        }
    }

    pub fn is_error(self) -> bool {
        self != Self::Enabled
    }
}
