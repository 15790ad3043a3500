//! Academy Error Types
//!
//! Content-side variants, converted to `kernel::error::AppError` at the HTTP
//! boundary.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type AcademyResult<T> = Result<T, AcademyError>;

#[derive(Debug, Error)]
pub enum AcademyError {
    #[error("Course not found")]
    CourseNotFound,

    #[error("Lesson not found")]
    LessonNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("News not found")]
    NewsNotFound,

    /// No snapshot fetched yet
    #[error("Market data is loading")]
    TickerLoading,

    /// Upstream market feed failed or returned garbage
    #[error("Market data error: {0}")]
    Market(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AcademyError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AcademyError::CourseNotFound
            | AcademyError::LessonNotFound
            | AcademyError::CategoryNotFound
            | AcademyError::NewsNotFound => ErrorKind::NotFound,
            AcademyError::TickerLoading => ErrorKind::ServiceUnavailable,
            AcademyError::Market(_) => ErrorKind::BadGateway,
            AcademyError::Database(_) | AcademyError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AcademyError::TickerLoading => err.with_action("Prices are loading, retry shortly"),
            AcademyError::LessonNotFound => err.with_action("Pick a lesson from the course list"),
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AcademyError::Database(e) => {
                tracing::error!(error = %e, "Academy database error");
            }
            AcademyError::Internal(msg) => {
                tracing::error!(message = %msg, "Academy internal error");
            }
            AcademyError::Market(msg) => {
                tracing::warn!(message = %msg, "Market data error");
            }
            _ => {
                tracing::debug!(error = %self, "Academy error");
            }
        }
    }
}

impl IntoResponse for AcademyError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AcademyError::CourseNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AcademyError::LessonNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AcademyError::TickerLoading.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AcademyError::Market("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_not_found_message_is_public() {
        let err = AcademyError::NewsNotFound.to_app_error();
        assert_eq!(err.public_message(), "News not found");
    }

    #[test]
    fn test_upstream_detail_is_masked() {
        let err = AcademyError::Market("api.coingecko.com: 500".into()).to_app_error();
        assert_eq!(
            err.public_message(),
            kernel::error::app_error::GENERIC_SERVER_MESSAGE
        );
    }
}
