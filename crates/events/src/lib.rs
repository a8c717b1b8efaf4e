//! Command/event plumbing for the medication domain.
//!
//! The traits here stay domain-agnostic; `medrem-medication` supplies the
//! concrete commands and events.

pub mod command;
pub mod event;
pub mod handler;

pub use command::Command;
pub use event::Event;
pub use handler::execute;
