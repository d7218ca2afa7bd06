//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("Forbidden: {0}")]
    Forbidden(String),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_joins_all_problems() {
        let err = DomainError::Validation(vec![
            "body is required".to_string(),
            "email is invalid".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: body is required, email is invalid"
        );
    }

    #[test]
    fn forbidden_carries_its_reason() {
        let err = DomainError::Forbidden("not yours".to_string());
        assert_eq!(err.to_string(), "Forbidden: not yours");
    }
}
