//! API error types

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error categories exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorType {
    ValidationError,
    AuthenticationError,
    NotFoundError,
    ConflictError,
    ServerError,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Error detail structure. Validation failures carry the field-level
/// message list in `errors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
    #[serde(rename = "type")]
    pub error_type: ApiErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
    /// Set for safe-default routing: the response becomes a redirect
    /// instead of a JSON error.
    location: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: ApiErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: ApiErrorDetail {
                    message: message.into(),
                    error_type,
                    errors: None,
                },
            },
            location: None,
        }
    }

    /// Validation failure with its field-level messages
    pub fn validation(errors: Vec<String>) -> Self {
        let mut err = Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorType::ValidationError,
            "Validation failed",
        );
        err.response.error.errors = Some(errors);
        err
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiErrorType::ValidationError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            ApiErrorType::AuthenticationError,
            message,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorType::NotFoundError, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiErrorType::ConflictError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorType::ServerError,
            message,
        )
    }

    /// The safe default for failed guard checks: route home rather than
    /// explain. A control-flow decision, not a fault.
    pub fn redirect_home() -> Self {
        let mut err = Self::new(
            StatusCode::SEE_OTHER,
            ApiErrorType::AuthenticationError,
            "Redirecting",
        );
        err.location = Some("/");
        err
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.location {
            Some(location) => {
                (self.status, [(header::LOCATION, location)]).into_response()
            }
            None => (self.status, Json(self.response)).into_response(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { errors } => Self::validation(errors),
            DomainError::Conflict { message } => Self::conflict(message),
            DomainError::Credential { message } => Self::unauthorized(message),
            DomainError::Storage { message } | DomainError::Internal { message } => {
                Self::internal(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_carries_message_list() {
        let err: ApiError = DomainError::validation_errors(vec![
            "Name cannot be empty".to_string(),
            "Content exceeds maximum length of 140 characters".to_string(),
        ])
        .into();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.response.error.errors.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn test_redirect_home_is_a_see_other() {
        let response = ApiError::redirect_home().into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_domain_error_mapping() {
        let err: ApiError = DomainError::not_found("User '1' not found").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = DomainError::conflict("Email taken").into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: ApiError = DomainError::storage("connection lost").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
