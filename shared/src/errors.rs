//! Shared error types for the smart city API

use std::fmt::Display;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Input rejected before any computation runs
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: String,
        max: String,
        value: String,
    },

    #[error("{field} length must equal {expected_field} ({expected}), got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected_field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{field} must be non-negative")]
    Negative { field: &'static str },

    #[error("{field} must be positive")]
    NotPositive { field: &'static str },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("request body does not match the requested {field} '{expected}'")]
    PolicyMismatch {
        field: &'static str,
        expected: String,
    },
}

impl ValidationError {
    /// Name of the offending request field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::LengthMismatch { field, .. }
            | ValidationError::Negative { field }
            | ValidationError::NotPositive { field }
            | ValidationError::NotFinite { field }
            | ValidationError::Empty { field }
            | ValidationError::PolicyMismatch { field, .. } => field,
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Reject `value` unless it lies in the inclusive `range`
pub fn ensure_in_range<T>(field: &'static str, value: T, range: RangeInclusive<T>) -> ValidationResult<()>
where
    T: PartialOrd + Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: range.start().to_string(),
            max: range.end().to_string(),
            value: value.to_string(),
        })
    }
}

/// Reject NaN and infinities
pub fn ensure_finite(field: &'static str, value: f64) -> ValidationResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field })
    }
}

/// Reject blank strings
pub fn ensure_not_blank(field: &'static str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        Err(ValidationError::Empty { field })
    } else {
        Ok(())
    }
}
