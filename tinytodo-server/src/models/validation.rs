//! Validation error types

use std::fmt;

/// Validation error for request arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Numeric argument must be at least 1
    NotPositive { field: &'static str },

    /// Request part could not be parsed at all
    Malformed { part: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::NotPositive { field } => write!(f, "{} must be a positive integer", field),
            Self::Malformed { part, reason } => write!(f, "malformed {}: {}", part, reason),
        }
    }
}

impl std::error::Error for ValidationError {}
