//! Process-wide logging setup.

/// Subscriber configuration (format, filter).
pub mod tracing;

pub use crate::tracing::{ENV_LOG_FORMAT, LogFormat, LogFormatError};

/// Initialize logging with the format named by `MEDREM_LOG_FORMAT`
/// (JSON when unset).
///
/// An unrecognized value is rejected and nothing is installed. Safe to call
/// multiple times; subsequent calls are no-ops.
pub fn init() -> Result<(), LogFormatError> {
    let format = LogFormat::from_lookup(|key| std::env::var(key).ok())?;
    crate::tracing::init_with(format);
    Ok(())
}

/// Initialize logging with an explicit format.
pub fn init_with(format: LogFormat) {
    crate::tracing::init_with(format);
}
