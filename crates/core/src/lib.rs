//! `medrem-core`: identifiers, errors and the aggregate traits the medication
//! crates build on. No IO, no clocks.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult};
pub use id::MedicationId;
pub use value_object::ValueObject;
