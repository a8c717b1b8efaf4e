//! Interactive shell over the reminder engine.

pub mod command;
pub mod config;
pub mod render;
pub mod session;

pub use command::{ParseError, ShellCommand, Target, parse_line};
pub use config::AppConfig;
pub use session::{Reply, Session};
