//! HTTP rendering of [`AppError`] as RFC 7807 problem details.

#[cfg(feature = "axum")]
use super::app_error::AppError;

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.public_message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use axum::body::to_bytes;
    use axum::response::IntoResponse;

    use crate::error::app_error::{AppError, GENERIC_SERVER_MESSAGE};
    use crate::error::kind::ErrorKind;

    #[tokio::test]
    async fn test_server_error_body_is_masked() {
        let response = AppError::new(ErrorKind::InternalServerError, "pool timed out")
            .with_action("Retry")
            .into_response();
        assert_eq!(response.status(), 500);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["detail"], GENERIC_SERVER_MESSAGE);
        assert_eq!(body["title"], "Internal Server Error");
        assert_eq!(body["action"], "Retry");
    }
}
