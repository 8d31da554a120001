use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            // Booking conflicts are reported as a plain client error.
            AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream { status, .. } => *status,
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> &str {
        match self {
            AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::Timeout(msg)
            | AppError::Database(msg)
            | AppError::Internal(msg) => msg,
            AppError::Upstream { message, .. } => message,
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self.detail());
        } else {
            tracing::warn!("Error: {}: {}", status, self.detail());
        }

        let body = Json(json!({
            "detail": self.detail()
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::ValidationError("x".into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(AppError::Conflict("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Timeout("x".into()).status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(AppError::Database("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            AppError::Upstream { status: StatusCode::NOT_FOUND, message: "gone".into() }.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_response_body_carries_detail() {
        let response = AppError::Conflict("Slot no longer available".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, json!({ "detail": "Slot no longer available" }));
    }
}
