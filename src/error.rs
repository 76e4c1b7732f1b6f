use std::io;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Custom error type for git_telegram_relay operations
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("No configuration found for project '{0}'")]
    ConfigNotFound(String),

    #[error("Webhook secret required for project '{0}' but none is configured")]
    SecretNotConfigured(String),

    #[error("Missing X-Hub-Signature-256 header")]
    MissingSignature,

    #[error("Invalid webhook signature")]
    InvalidSignature,

    #[error("Missing request body")]
    MissingRawBody,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Failed to send Telegram message: {0}")]
    DeliveryFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::ConfigNotFound(_) => StatusCode::NOT_FOUND,
            RelayError::MissingSignature | RelayError::InvalidSignature => StatusCode::UNAUTHORIZED,
            RelayError::MissingRawBody | RelayError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            RelayError::SecretNotConfigured(_)
            | RelayError::DeliveryFailed(_)
            | RelayError::ConfigError(_)
            | RelayError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            RelayError::DeliveryFailed(detail) => json!({
                "error": "Failed to send Telegram message",
                "details": detail,
            }),
            // Server-side detail stays in the logs.
            RelayError::ConfigError(_) | RelayError::IoError(_) => {
                json!({ "error": "Internal server error" })
            }
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

/// Helper type for Results that use RelayError
pub type Result<T> = std::result::Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            RelayError::ConfigNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RelayError::SecretNotConfigured("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(RelayError::MissingSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(RelayError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(RelayError::MissingRawBody.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            RelayError::MalformedPayload("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RelayError::DeliveryFailed("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn delivery_failure_response_carries_details() {
        let response = RelayError::DeliveryFailed("chat not found".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
