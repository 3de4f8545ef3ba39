//! Error types for record validation and the wire codec.

use thiserror::Error;

/// Raised when a typed record is constructed (or decoded) with a field
/// outside its declared constraint. Records are never observable in a
/// partially-valid state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("field '{0}' must not be empty")]
    Empty(&'static str),

    #[error("field '{0}' must be positive, got {1}")]
    NotPositive(&'static str, f64),

    #[error("field '{0}' must not be negative, got {1}")]
    Negative(&'static str, f64),

    #[error("field '{field}' must be within [{low}, {high}], got {value}")]
    OutOfRange {
        field: &'static str,
        low: f64,
        high: f64,
        value: f64,
    },
}

/// Raised at the wire-decode boundary. The dispatch loop logs these and
/// drops the offending envelope; they never propagate into handlers.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("unknown event kind '{0}'")]
    UnknownKind(String),

    #[error("malformed '{kind}' payload: {source}")]
    Malformed {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("payload is not a JSON object")]
    NotAnObject,

    #[error("decoded record failed validation: {0}")]
    Invalid(#[from] ValidationError),

    #[error("failed to serialize record: {0}")]
    Serialize(#[source] serde_json::Error),
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(())
    }
}

pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NotPositive(field, value))
    }
}

pub(crate) fn require_positive_opt(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => require_positive(field, v),
        None => Ok(()),
    }
}

pub(crate) fn require_non_negative_opt(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < 0.0 => Err(ValidationError::Negative(field, v)),
        _ => Ok(()),
    }
}

pub(crate) fn require_in_range(
    field: &'static str,
    low: f64,
    high: f64,
    value: f64,
) -> Result<(), ValidationError> {
    if value < low || value > high {
        Err(ValidationError::OutOfRange {
            field,
            low,
            high,
            value,
        })
    } else {
        Ok(())
    }
}
