//! Auth Error Types
//!
//! Auth-specific variants, converted to `kernel::error::AppError` at the
//! HTTP boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

/// Shown for every failed login, whatever the cause
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user, wrong password, or malformed input
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Session missing, expired, or token forged
    #[error("Session not found or expired")]
    SessionInvalid,

    /// Valid session, insufficient role
    #[error("Your membership does not include this content")]
    NotEntitled,

    #[error("Too many requests")]
    RateLimited { retry_after_secs: u64 },

    /// Remote role verifier failed
    #[error("Role verification unavailable: {0}")]
    VerifierUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::NotEntitled => ErrorKind::Forbidden,
            AuthError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AuthError::VerifierUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::SessionInvalid => err.with_action("Please sign in again"),
            AuthError::RateLimited { .. } => err.with_action("Wait a moment and try again"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::VerifierUnavailable(msg) => {
                tracing::warn!(message = %msg, "Role verifier unavailable");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RateLimited { retry_after_secs } => {
                tracing::warn!(retry_after_secs, "Auth rate limit hit");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        let retry_after = match &self {
            AuthError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
            _ => None,
        };

        let mut response = self.to_app_error().into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(http::header::RETRY_AFTER, http::HeaderValue::from(secs));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::SessionInvalid.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::NotEntitled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::RateLimited { retry_after_secs: 5 }.status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            AuthError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        assert_eq!(
            AuthError::InvalidCredentials.to_app_error().public_message(),
            INVALID_CREDENTIALS_MESSAGE
        );
    }

    #[test]
    fn test_server_errors_are_masked() {
        let err = AuthError::Internal("pool exhausted at db-1".into()).to_app_error();
        assert_eq!(
            err.public_message(),
            kernel::error::app_error::GENERIC_SERVER_MESSAGE
        );
    }

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = AuthError::RateLimited { retry_after_secs: 7 }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()[http::header::RETRY_AFTER], "7");
    }
}
