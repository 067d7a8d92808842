//! Domain model for village records.
//!
//! # Responsibility
//! - Define the `User` and `Resident` records and their enumerations.
//! - Provide required-field validation used before every write.
//!
//! # Invariants
//! - Every record is identified by a caller-supplied `RecordId` that never
//!   changes after creation.
//! - Deletion is a hard delete; there are no tombstones.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod resident;
pub mod user;

/// Opaque record identifier shared by both collections.
pub type RecordId = String;

/// Generates a fresh identifier for a new record.
pub fn new_record_id() -> RecordId {
    Uuid::new_v4().to_string()
}

/// Required-field check failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingField {
        record: &'static str,
        field: &'static str,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { record, field } => {
                write!(f, "{record}.{field} must not be empty")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require(
    record: &'static str,
    field: &'static str,
    value: &str,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { record, field });
    }
    Ok(())
}
