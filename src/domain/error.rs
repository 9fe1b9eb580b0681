use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Single-message validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![message.into()],
        }
    }

    /// Field-level validation failures, surfaced together.
    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_joins_field_messages() {
        let err = DomainError::validation_errors(vec![
            "Name cannot be empty".to_string(),
            "Email cannot be empty".to_string(),
        ]);

        let text = err.to_string();
        assert!(text.contains("Name cannot be empty"));
        assert!(text.contains("Email cannot be empty"));
    }

    #[test]
    fn test_constructors() {
        assert!(matches!(
            DomainError::not_found("x"),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            DomainError::conflict("x"),
            DomainError::Conflict { .. }
        ));
    }
}
