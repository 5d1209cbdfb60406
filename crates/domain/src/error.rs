//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into [`LedgerError`]
//! via `#[from]`. Validators never panic and never mutate; a failure leaves
//! nothing to unwind.

use std::fmt;

/// Top-level error returned by services and ports.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("capacity exceeded: {0}")]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Conflict(#[from] ConflictError),

    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// A field-level or record-level invariant does not hold.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Wrong length, repeated digits, or checksum mismatch.
    #[error("malformed fiscal identifier")]
    MalformedIdentifier,

    #[error(transparent)]
    AreaInvariant(#[from] AreaInvariantViolation),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("{field} must be between {min} and {max} characters long")]
    FieldLength {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} must be a finite, non-negative number of hectares")]
    NegativeArea { field: &'static str },

    #[error("year {year} is outside {min}..={max}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("page and limit must be positive, limit at most {max}")]
    InvalidPage { max: u32 },
}

/// `cultivable + vegetation` exceeds the declared total area.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error(
    "cultivable area ({cultivable} ha) plus vegetation area ({vegetation} ha) exceeds total area ({total} ha)"
)]
pub struct AreaInvariantViolation {
    pub total: f64,
    pub cultivable: f64,
    pub vegetation: f64,
}

/// A planting allocation does not fit in the farm's cultivable area.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CapacityError {
    #[error("planting area ({proposed} ha) exceeds the farm's cultivable area ({capacity} ha)")]
    SingleAllocationExceedsCapacity { proposed: f64, capacity: f64 },

    #[error(
        "total planted area ({aggregate} ha) for this harvest exceeds the farm's cultivable area ({capacity} ha)"
    )]
    AggregateAllocationExceedsCapacity { aggregate: f64, capacity: f64 },
}

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// A uniqueness constraint would be violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConflictError {
    #[error("a producer with document {0} already exists")]
    DuplicateDocument(String),

    #[error("a {entity} named {name:?} already exists")]
    DuplicateName { entity: &'static str, name: String },
}

impl LedgerError {
    /// Short machine-readable name of the error kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Capacity(_) => ErrorKind::Capacity,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }
}

impl From<AreaInvariantViolation> for LedgerError {
    fn from(err: AreaInvariantViolation) -> Self {
        Self::Validation(err.into())
    }
}

/// Coarse classification of [`LedgerError`], used by adapters to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Capacity,
    NotFound,
    Conflict,
    Storage,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::Capacity => "capacity",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Storage => "storage",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_wrap_area_violation_as_validation_error() {
        let err: LedgerError = AreaInvariantViolation {
            total: 10.0,
            cultivable: 8.0,
            vegetation: 3.0,
        }
        .into();
        assert!(matches!(
            err,
            LedgerError::Validation(ValidationError::AreaInvariant(_))
        ));
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn should_format_not_found_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Farm",
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Farm abc not found");
    }

    #[test]
    fn should_classify_capacity_errors() {
        let err: LedgerError = CapacityError::AggregateAllocationExceedsCapacity {
            aggregate: 750.0,
            capacity: 700.0,
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(err.kind().to_string(), "capacity");
    }
}
