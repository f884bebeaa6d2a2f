//! API error envelope
//!
//! Registration failures serialize as `{"code": <int>, "message"?: <string>}`.
//! Other failures carry only a `message`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::registration::{MessageCode, RegistrationError, EMPTY_PASSWORD_MESSAGE};
use crate::domain::DomainError;

/// Error body returned to clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<MessageCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    /// Error carrying a message code and an optional message
    pub fn coded(status: StatusCode, code: MessageCode, message: Option<&str>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                code: Some(code),
                message: message.map(String::from),
            },
        }
    }

    /// Error carrying only a message
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                code: None,
                message: Some(message.into()),
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// HTTP status for each registration message code
fn status_for(code: MessageCode) -> StatusCode {
    match code {
        MessageCode::DeviceCodeMissing => StatusCode::UNPROCESSABLE_ENTITY,
        MessageCode::InvalidPhone
        | MessageCode::InvalidNameLength
        | MessageCode::InvalidNameCharset
        | MessageCode::NameTaken
        | MessageCode::PhoneTaken => StatusCode::FORBIDDEN,
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        match err.code() {
            Some(code) => Self::coded(status_for(code), code, err.public_message()),
            None => match err {
                RegistrationError::EmptyPassword => {
                    Self::unprocessable(EMPTY_PASSWORD_MESSAGE)
                }
                RegistrationError::Storage(inner) | RegistrationError::Internal(inner) => {
                    inner.into()
                }
                other => Self::internal(other.to_string()),
            },
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match &err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Conflict { message, .. } => Self::conflict(message),
            // Internal details stay in the logs
            DomainError::Configuration { .. }
            | DomainError::Internal { .. }
            | DomainError::Storage { .. } => {
                tracing::error!(error = %err, "Request failed");
                Self::internal("internal server error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.body.code, &self.body.message) {
            (Some(code), Some(message)) => write!(f, "{} ({}): {}", self.status, code, message),
            (Some(code), None) => write!(f, "{} ({})", self.status, code),
            (None, Some(message)) => write!(f, "{}: {}", self.status, message),
            (None, None) => write!(f, "{}", self.status),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::UserValidationError;

    fn body_json(err: &ApiError) -> serde_json::Value {
        serde_json::to_value(&err.body).unwrap()
    }

    #[test]
    fn test_device_code_missing() {
        let err: ApiError = RegistrationError::DeviceCodeMissing.into();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(&err),
            serde_json::json!({"code": 1014, "message": "device code must not be empty"})
        );
    }

    #[test]
    fn test_stage_failures_are_forbidden_and_code_only() {
        let cases = [
            (
                RegistrationError::InvalidPhone(UserValidationError::EmptyPhone),
                1000,
            ),
            (
                RegistrationError::InvalidNameLength(UserValidationError::NameTooShort(4)),
                1002,
            ),
            (
                RegistrationError::InvalidNameCharset(UserValidationError::InvalidNameStart('+')),
                1003,
            ),
            (RegistrationError::NameTaken("taken".to_string()), 1004),
            (RegistrationError::PhoneTaken("18781994583".to_string()), 1010),
        ];

        for (registration_err, code) in cases {
            let err: ApiError = registration_err.into();
            assert_eq!(err.status, StatusCode::FORBIDDEN);
            assert_eq!(body_json(&err), serde_json::json!({ "code": code }));
        }
    }

    #[test]
    fn test_storage_failure_hides_details() {
        let err: ApiError =
            RegistrationError::Storage(DomainError::storage("connection refused")).into();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&err),
            serde_json::json!({"message": "internal server error"})
        );
    }

    #[test]
    fn test_hash_failure_hides_details() {
        let err: ApiError =
            RegistrationError::Internal(DomainError::internal("Failed to hash password")).into();

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(&err),
            serde_json::json!({"message": "internal server error"})
        );
    }

    #[test]
    fn test_empty_password_is_unprocessable_without_code() {
        let err: ApiError = RegistrationError::EmptyPassword.into();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(&err),
            serde_json::json!({"message": "password must not be empty"})
        );
    }

    #[test]
    fn test_domain_error_conversion() {
        let err: ApiError = DomainError::not_found("User not found").into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        let err: ApiError = DomainError::validation("Invalid user ID").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_display() {
        let err = ApiError::coded(StatusCode::FORBIDDEN, MessageCode::NameTaken, None);
        assert_eq!(err.to_string(), "403 Forbidden (1004)");
    }
}
