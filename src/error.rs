// Error handling module for the DementiCare API
// Provides centralized error types and HTTP response conversion

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Main error type for the API
/// All resource handlers return Result<T, ApiError>
///
/// Each variant maps to one HTTP status code. Server-side failures carry
/// their cause for logging but only a generic message reaches the client.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input
    /// Maps to HTTP 400 Bad Request
    BadRequest(String),

    /// Field-level validation failures from the validator crate
    /// Maps to HTTP 400 Bad Request
    ValidationError(validator::ValidationErrors),

    /// Missing, invalid or expired credential, or wrong password
    /// Maps to HTTP 401 Unauthorized
    Unauthorized(String),

    /// Role not permitted for the action
    /// Maps to HTTP 403 Forbidden
    Forbidden(String),

    /// Id does not resolve to a live row
    /// Maps to HTTP 404 Not Found
    NotFound { resource: &'static str },

    /// Unique constraint conflict
    /// Maps to HTTP 409 Conflict
    Conflict(String),

    /// External dependency unreachable
    /// Maps to HTTP 503 Service Unavailable
    ServiceUnavailable(String),

    /// Database operation errors
    /// Maps to HTTP 500 Internal Server Error
    DatabaseError(sqlx::Error),

    /// Any other server-side failure
    /// Maps to HTTP 500 Internal Server Error
    InternalError(String),
}

/// JSON body shared by every error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub error: String,

    /// Machine-readable code, e.g. "NOT_FOUND"
    pub error_code: &'static str,

    /// Field-level details for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,

    /// RFC 3339 timestamp of when the error was produced
    pub timestamp: String,
}

impl ErrorResponse {
    pub fn new(error_code: &'static str, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            error_code,
            details: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.to_error_response();
        (status, Json(body)).into_response()
    }
}

impl ApiError {
    pub fn not_found(resource: &'static str) -> Self {
        ApiError::NotFound { resource }
    }

    /// Convert to a status code and client-facing body, logging by severity
    fn to_error_response(&self) -> (StatusCode, ErrorResponse) {
        let status = self.status_code();
        match self {
            ApiError::BadRequest(message) => {
                debug!("Bad request: {}", message);
                (status, ErrorResponse::new("BAD_REQUEST", message.clone()))
            }
            ApiError::ValidationError(errors) => {
                debug!("Validation error: {:?}", errors);
                let mut body = ErrorResponse::new("VALIDATION_ERROR", validation_message(errors));
                body.details = serde_json::to_value(errors).ok();
                (status, body)
            }
            ApiError::Unauthorized(message) => {
                warn!("Unauthorized: {}", message);
                (status, ErrorResponse::new("UNAUTHORIZED", message.clone()))
            }
            ApiError::Forbidden(message) => {
                warn!("Forbidden: {}", message);
                (status, ErrorResponse::new("FORBIDDEN", message.clone()))
            }
            ApiError::NotFound { resource } => {
                debug!("{} not found", resource);
                (status, ErrorResponse::new("NOT_FOUND", format!("{} not found", resource)))
            }
            ApiError::Conflict(message) => {
                warn!("Conflict: {}", message);
                (status, ErrorResponse::new("CONFLICT", message.clone()))
            }
            ApiError::ServiceUnavailable(message) => {
                error!("Service unavailable: {}", message);
                (status, ErrorResponse::new("SERVICE_UNAVAILABLE", message.clone()))
            }
            ApiError::DatabaseError(db_error) => {
                error!("Database error: {:?}", db_error);
                (status, ErrorResponse::new("DATABASE_ERROR", "A database error occurred"))
            }
            ApiError::InternalError(internal_msg) => {
                error!("Internal error: {}", internal_msg);
                (
                    status,
                    ErrorResponse::new("INTERNAL_ERROR", "An internal server error occurred"),
                )
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Flatten validator errors into one readable sentence
///
/// Uses the rule's message when one is declared, the rule code otherwise.
fn validation_message(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{}: {}", field, e.code),
            })
        })
        .collect();
    parts.sort();

    if parts.is_empty() {
        "Request validation failed".to_string()
    } else {
        parts.join("; ")
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(error: sqlx::Error) -> Self {
        ApiError::DatabaseError(error)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct PasswordBody {
        #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
        password: String,
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::BadRequest("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized("x".into()).status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("Patient").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::ServiceUnavailable("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::DatabaseError(sqlx::Error::RowNotFound).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_database_error_does_not_leak_details() {
        let (_, body) = ApiError::DatabaseError(sqlx::Error::PoolTimedOut).to_error_response();
        assert_eq!(body.error, "A database error occurred");
        assert!(!body.error.contains("timed out"));

        let (_, body) = ApiError::InternalError("secret detail".into()).to_error_response();
        assert!(!body.error.contains("secret detail"));
    }

    #[test]
    fn test_validation_message_uses_declared_message() {
        let errors = PasswordBody { password: "abc".into() }.validate().unwrap_err();
        let (status, body) = ApiError::from(errors).to_error_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "Password must be at least 6 characters");
        assert!(body.details.is_some());
    }

    #[test]
    fn test_not_found_message() {
        let (_, body) = ApiError::not_found("Appointment").to_error_response();
        assert_eq!(body.error, "Appointment not found");
        assert_eq!(body.error_code, "NOT_FOUND");
    }
}
