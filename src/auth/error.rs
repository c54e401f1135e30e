// Authentication and authorization error types

use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::error::ApiError;

/// Authentication and authorization error types
#[derive(Debug)]
pub enum AuthError {
    // Gate failures
    MissingToken,
    InvalidAuthorizationFormat,
    /// Bad signature, malformed token, wrong algorithm, expiry or claim shape.
    /// The client sees one message for all of them.
    InvalidToken,

    // Credential failures
    InvalidCredentials,
    InvalidOldPassword,
    UserNotFound,
    EmailAlreadyExists,

    // Server-side failures
    DatabaseError(sqlx::Error),
    PasswordHashError(String),
    TokenGenerationError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "Authorization header required"),
            AuthError::InvalidAuthorizationFormat => write!(f, "Invalid authorization format"),
            AuthError::InvalidToken => write!(f, "Invalid or expired token"),
            AuthError::InvalidCredentials => write!(f, "Invalid email or password"),
            AuthError::InvalidOldPassword => write!(f, "Invalid old password"),
            AuthError::UserNotFound => write!(f, "User not found"),
            AuthError::EmailAlreadyExists => write!(f, "Email already exists"),
            AuthError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AuthError::PasswordHashError(msg) => write!(f, "Password hashing error: {}", msg),
            AuthError::TokenGenerationError(msg) => write!(f, "Token generation error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::DatabaseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> Self {
        AuthError::DatabaseError(error)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::MissingToken
            | AuthError::InvalidAuthorizationFormat
            | AuthError::InvalidToken
            | AuthError::InvalidCredentials
            | AuthError::InvalidOldPassword => ApiError::Unauthorized(error.to_string()),
            AuthError::UserNotFound => ApiError::not_found("User"),
            AuthError::EmailAlreadyExists => ApiError::Conflict(error.to_string()),
            AuthError::DatabaseError(e) => ApiError::DatabaseError(e),
            AuthError::PasswordHashError(_) | AuthError::TokenGenerationError(_) => {
                ApiError::InternalError(error.to_string())
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_gate_failures_are_unauthorized() {
        for error in [
            AuthError::MissingToken,
            AuthError::InvalidAuthorizationFormat,
            AuthError::InvalidToken,
        ] {
            assert_eq!(ApiError::from(error).status_code(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_credential_failures_map_to_expected_status() {
        assert_eq!(
            ApiError::from(AuthError::InvalidCredentials).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::from(AuthError::UserNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(AuthError::EmailAlreadyExists).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(AuthError::PasswordHashError("salt".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gate_messages() {
        assert_eq!(AuthError::MissingToken.to_string(), "Authorization header required");
        assert_eq!(
            AuthError::InvalidAuthorizationFormat.to_string(),
            "Invalid authorization format"
        );
        assert_eq!(AuthError::InvalidToken.to_string(), "Invalid or expired token");
    }
}
