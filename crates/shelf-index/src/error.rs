//! Error types for shelf-index.

use std::fmt;

/// Errors that can occur while building or querying an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// Vector lengths disagree, or a query does not match the index dimension.
    DimensionMismatch {
        expected: usize,
        actual: usize,
    },
    /// Invalid build parameter value.
    InvalidParameter(String),
}

impl fmt::Display for IndexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexError::DimensionMismatch { expected, actual } => {
                write!(f, "dimension mismatch: expected {} components, got {}", expected, actual)
            }
            IndexError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for IndexError {}
