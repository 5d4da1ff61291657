//! Study Assistant error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Study Assistant error type
#[derive(Error, Debug)]
pub enum Error {
    /// Entity absent, or present but not owned by the caller
    #[error("{0} not found")]
    NotFound(String),

    /// Malformed request input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or unknown principal
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Operation not allowed in the entity's current state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body over the configured upload limit
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The grading call failed or produced an unusable response
    #[error("Grading unavailable: {0}")]
    GradingUnavailable(String),

    /// Hosted LLM or vector store failure
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Study Assistant operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            Self::GradingUnavailable(_) => (StatusCode::BAD_GATEWAY, "GRADING_UNAVAILABLE"),
            Self::ExternalService(_) | Self::Http(_) => {
                (StatusCode::BAD_GATEWAY, "EXTERNAL_SERVICE_ERROR")
            }
            Self::Config(_)
            | Self::Database(_)
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

/// API error detail
#[derive(Debug, Serialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        if status.is_server_error() {
            tracing::error!(code, error = %self, "Request failed");
        }
        // Database and internal details stay in the log
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            _ => self.to_string(),
        };
        let body = ApiError {
            error: ApiErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let (status, code) = Error::not_found("Session").status_and_code();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(code, "NOT_FOUND");
    }

    #[test]
    fn test_grading_unavailable_is_distinct_from_external() {
        let (grading_status, grading_code) =
            Error::GradingUnavailable("run failed".into()).status_and_code();
        let (external_status, external_code) =
            Error::ExternalService("timeout".into()).status_and_code();
        assert_eq!(grading_status, external_status);
        assert_ne!(grading_code, external_code);
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let (status, code) = Error::PayloadTooLarge("limit is 64 bytes".into()).status_and_code();
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(code, "PAYLOAD_TOO_LARGE");
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(Error::not_found("Homework").to_string(), "Homework not found");
        assert_eq!(
            Error::Conflict("already graded".into()).to_string(),
            "Conflict: already graded"
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let resp = Error::not_found("Task").into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Task not found");
    }

    #[tokio::test]
    async fn test_internal_errors_are_masked() {
        let resp = Error::Internal("secret detail".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(resp.into_body(), 1024).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("secret detail"));
    }
}
