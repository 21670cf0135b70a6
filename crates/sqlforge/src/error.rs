//! Error types for sqlforge

use crate::statement::OperationKind;
use thiserror::Error;

/// Result type alias for builder operations
pub type BuildResult<T> = Result<T, BuildError>;

/// Error types for statement building and compilation
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// Malformed field signature or unparseable date/float literal
    #[error("Format error: {0}")]
    Format(String),

    /// Insert/update value count differs from the declared field count
    #[error("Field count mismatch: expected {expected} values, got {actual}")]
    FieldCountMismatch { expected: usize, actual: usize },

    /// Compile attempted before any operation was configured
    #[error("Operation not set")]
    OperationNotSet,

    /// UPDATE or DELETE compiled without a filter predicate
    #[error("Refusing to compile {0} without a WHERE clause")]
    UnsafeOperation(OperationKind),

    /// Execution requested with no executor configured
    #[error("Connection not set")]
    ConnectionNotSet,

    /// Table index outside the declared table list
    #[error("Unknown table index {index} (have {len} tables)")]
    UnknownTable { index: usize, len: usize },

    /// Operation has no values (rows, fields) to render
    #[error("{0} has no values to render")]
    MissingValues(OperationKind),

    /// Inlining found a different number of placeholders than parameters
    #[error("Placeholder mismatch: placeholders({placeholders}) != params({params})")]
    PlaceholderMismatch { placeholders: usize, params: usize },

    /// Error reported by the executor
    #[error("Execution error: {0}")]
    Execution(String),
}

impl BuildError {
    /// Create a format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Check if this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }

    /// Check if this is an unsafe operation refusal
    pub fn is_unsafe_operation(&self) -> bool {
        matches!(self, Self::UnsafeOperation(_))
    }

    /// Check if this is a field count mismatch
    pub fn is_field_count_mismatch(&self) -> bool {
        matches!(self, Self::FieldCountMismatch { .. })
    }
}
