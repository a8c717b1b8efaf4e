//! Subscriber initialization.
//!
//! Filtering follows `RUST_LOG` and defaults to `info`.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

pub const ENV_LOG_FORMAT: &str = "MEDREM_LOG_FORMAT";

/// Output layout for log lines.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, multi-line.
    Pretty,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid value for {}: {:?} (expected json|pretty)", ENV_LOG_FORMAT, .0)]
pub struct LogFormatError(pub String);

impl LogFormat {
    pub fn parse(raw: &str) -> Result<Self, LogFormatError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(LogFormatError(other.to_string())),
        }
    }

    /// Read `MEDREM_LOG_FORMAT` through `lookup`; unset means the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LogFormatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(ENV_LOG_FORMAT) {
            None => Ok(Self::default()),
            Some(raw) => Self::parse(&raw).map_err(|_| LogFormatError(raw)),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogFormat {
    type Err = LogFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. A second call leaves the first one in place.
pub fn init_with(format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_timer(tracing_subscriber::fmt::time::SystemTime);

    let _ = match format {
        LogFormat::Json => builder.json().with_target(true).try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
}
