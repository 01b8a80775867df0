//! Custom error types for PiggyBank
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for PiggyBank operations
#[derive(Error, Debug)]
pub enum PiggyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors (naming conflicts)
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The caller is authenticated but may not touch this resource
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// No authenticated user was supplied
    #[error("Not signed in: pass --as <username> or set PIGGYBANK_USER")]
    Unauthenticated,

    /// Report rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl PiggyError {
    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for households
    pub fn household_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Household",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expense shares
    pub fn share_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Share",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for report files
    pub fn report_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Report",
            identifier: identifier.into(),
        }
    }

    /// A sum of money that does not fit in i64 cents
    pub fn total_out_of_range(what: &str) -> Self {
        Self::Validation(format!("{} is out of range", what))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a naming conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Check if this is an authorization failure
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_) | Self::Unauthenticated)
    }

    /// Check if this is a failure of the store, the filesystem or the renderer
    pub fn is_dependency(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Io(_)
                | Self::Json(_)
                | Self::Render(_)
                | Self::Export(_)
                | Self::Storage(_)
        )
    }
}

impl From<std::io::Error> for PiggyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PiggyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for PiggyBank operations
pub type PiggyResult<T> = Result<T, PiggyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PiggyError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = PiggyError::report_not_found("report_1.pdf");
        assert_eq!(err.to_string(), "Report not found: report_1.pdf");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_is_distinct_from_validation() {
        let err = PiggyError::Duplicate {
            entity_type: "Expense",
            identifier: "Rent".into(),
        };
        assert_eq!(err.to_string(), "Expense already exists: Rent");
        assert!(err.is_conflict());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_authorization_errors() {
        assert!(PiggyError::Forbidden("report".into()).is_forbidden());
        assert!(PiggyError::Unauthenticated.is_forbidden());
        assert!(!PiggyError::Unauthenticated.is_dependency());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PiggyError = io_err.into();
        assert!(matches!(err, PiggyError::Io(_)));
        assert!(err.is_dependency());
    }
}
