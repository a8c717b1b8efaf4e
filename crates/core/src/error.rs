//! Errors shared by the medication domain.

use thiserror::Error;

use crate::id::MedicationId;

pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic failures only: bad input or a command sent to the wrong
/// record. Low and insufficient stock are reported as events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("invalid medication id: {0}")]
    InvalidId(String),

    /// The record has not been registered yet.
    #[error("medication not registered")]
    NotRegistered,

    #[error("medication {0} is already registered")]
    AlreadyRegistered(MedicationId),

    /// A command addressed a different record than the one it was run on.
    #[error("command for {command} sent to {record}")]
    WrongRecord {
        record: MedicationId,
        command: MedicationId,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
