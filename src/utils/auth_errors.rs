// Authentication-specific error handling utilities

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use thiserror::Error;

/// Authentication-specific errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid or malformed token")]
    InvalidToken,

    #[error("Refresh token expired or superseded")]
    ExpiredToken,

    #[error("User not found")]
    UserNotFound,

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Token generation failed: {0}")]
    TokenError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error")]
    InternalError,
}

/// Standard authentication error response structure
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub description: String,
}

impl AuthError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::ExpiredToken => StatusCode::UNAUTHORIZED,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::TenantNotFound => StatusCode::NOT_FOUND,
            AuthError::AccountInactive => StatusCode::FORBIDDEN,
            AuthError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AuthError::TokenError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert to error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidToken => "INVALID_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::TenantNotFound => "TENANT_NOT_FOUND",
            AuthError::AccountInactive => "ACCOUNT_INACTIVE",
            AuthError::ValidationError(_) => "VALIDATION_ERROR",
            AuthError::TokenError(_) => "TOKEN_ERROR",
            AuthError::DatabaseError(_) => "DATABASE_ERROR",
            AuthError::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let response = AuthErrorResponse {
            success: false,
            error: ErrorDetail {
                code: self.error_code().to_string(),
                description: self.to_string(),
            },
            message: self.to_string(),
        };

        (status, Json(response)).into_response()
    }
}

impl From<crate::services::jwt::JwtError> for AuthError {
    fn from(err: crate::services::jwt::JwtError) -> Self {
        use crate::services::jwt::JwtError;
        match err {
            JwtError::TokenExpired => AuthError::ExpiredToken,
            JwtError::InvalidToken => AuthError::InvalidToken,
            JwtError::EncodingError(_) => AuthError::InvalidToken,
            JwtError::KeyGenerationError(e) => AuthError::TokenError(e),
        }
    }
}

/// Helper function to log authentication failures
pub fn log_auth_failure(user_email: &str, error: &AuthError, user_agent: Option<&str>) {
    tracing::warn!(
        email = user_email,
        user_agent = user_agent.unwrap_or("unknown"),
        error_code = error.error_code(),
        "Authentication failure"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::ExpiredToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::AccountInactive.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::ValidationError("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_jwt_error_mapping() {
        use crate::services::jwt::JwtError;

        assert!(matches!(
            AuthError::from(JwtError::TokenExpired),
            AuthError::ExpiredToken
        ));
        assert!(matches!(
            AuthError::from(JwtError::InvalidToken),
            AuthError::InvalidToken
        ));
        assert!(matches!(
            AuthError::from(JwtError::EncodingError("bad".to_string())),
            AuthError::InvalidToken
        ));
    }
}
