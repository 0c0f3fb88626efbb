//! Domain error model.

use thiserror::Error;

/// Result type used across the variant engine.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Incomplete configuration is not an error in this domain: attributes that
/// are not ready for generation are skipped, and an unfinished selection is
/// simply unresolved. What remains here are edits that address something that
/// does not exist, or that contradict the product's shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed persisted record).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A positional edit addressed an index past the end of its list.
    #[error("{what} index {index} out of range (len {len})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::OutOfRange { what, index, len }
    }

    /// Fails with [`DomainError::OutOfRange`] unless `index < len`.
    pub fn check_index(what: &'static str, index: usize, len: usize) -> DomainResult<()> {
        if index < len {
            Ok(())
        } else {
            Err(Self::out_of_range(what, index, len))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_index_accepts_in_bounds() {
        assert!(DomainError::check_index("attribute", 0, 1).is_ok());
    }

    #[test]
    fn check_index_reports_position_and_len() {
        let err = DomainError::check_index("value", 3, 2).unwrap_err();
        assert_eq!(err, DomainError::out_of_range("value", 3, 2));
        assert_eq!(err.to_string(), "value index 3 out of range (len 2)");
    }
}
