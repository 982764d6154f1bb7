//! Configuration validation errors.

use thiserror::Error;

/// Errors raised while turning configuration into engine rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A threshold that must not be negative was negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: i64 },
}
