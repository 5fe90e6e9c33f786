//! Storage error types and handling
//!
//! Errors raised while loading, querying or persisting the JSON collections.

use std::path::Path;

use thiserror::Error;

/// Custom storage error type
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Record not found
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Uniqueness rule violated (e.g. duplicate username)
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Collection file could not be read or written
    #[error("Storage I/O failed on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Collection file holds malformed JSON
    #[error("Malformed collection {path}: {source}")]
    Serialization {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DatabaseError {
    /// Create a new NotFound error with context
    pub fn not_found(context: impl Into<String>) -> Self {
        DatabaseError::NotFound(context.into())
    }

    /// Create a new ConstraintViolation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        DatabaseError::ConstraintViolation(msg.into())
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        DatabaseError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn serialization(path: &Path, source: serde_json::Error) -> Self {
        DatabaseError::Serialization {
            path: path.display().to_string(),
            source,
        }
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }

    /// Check if this is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DatabaseError::ConstraintViolation(_))
    }
}

/// Result type for storage operations
pub type DbResult<T> = std::result::Result<T, DatabaseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = DatabaseError::not_found("bug_id=123");
        assert!(err.is_not_found());
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_constraint_error() {
        let err = DatabaseError::constraint("username already taken");
        assert!(err.is_constraint_violation());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = DatabaseError::io(
            Path::new("data/bug.json"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("data/bug.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_display() {
        let err = DatabaseError::not_found("record");
        assert!(err.to_string().contains("not found"));
    }
}
