//! Domain-level error types.

use thiserror::Error;

use crate::forms::ValidationErrors;

/// Domain errors - business logic failures surfaced by the access layer.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Authentication required")]
    AuthenticationRequired,

    /// The requester may read the entity but not change it.
    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

impl From<ValidationErrors> for DomainError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => DomainError::Internal("row vanished during write".to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DomainError::not_found("group", "ramax");
        assert_eq!(err.to_string(), "Entity not found: group ramax");
    }

    #[test]
    fn test_repo_error_becomes_internal() {
        let err: DomainError = RepoError::Query("syntax error".to_string()).into();
        assert!(matches!(err, DomainError::Internal(msg) if msg.contains("syntax error")));
    }
}
