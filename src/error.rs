//! HTTP-facing error type.
//!
//! Only failures outside the redirect path end up here: an unknown short id is
//! answered by the redirect handler itself, and analytics failures never
//! reach a redirect response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    Unavailable { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::Unavailable {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Backend(reason) => {
                tracing::error!("Event store unavailable: {}", reason);
                AppError::unavailable("Event store unavailable", json!({}))
            }
            StoreError::Serialization(e) => {
                tracing::error!("Corrupt event in store: {}", e);
                AppError::internal("Failed to read events", json!({}))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match self {
            AppError::Validation { message, details } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                details,
            ),
            AppError::Unavailable { message, details } => (
                StatusCode::SERVICE_UNAVAILABLE,
                "unavailable",
                message,
                details,
            ),
            AppError::Internal { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                message,
                details,
            ),
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::bad_request("bad", json!({})), StatusCode::BAD_REQUEST),
            (
                AppError::unavailable("down", json!({})),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                AppError::internal("boom", json!({})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_store_backend_error_maps_to_unavailable() {
        let error: AppError = StoreError::Backend("connection refused".to_string()).into();

        assert!(matches!(error, AppError::Unavailable { .. }));
    }

    #[test]
    fn test_display_is_message() {
        let error = AppError::bad_request("Expected text/html body", json!({}));

        assert_eq!(error.to_string(), "Expected text/html body");
    }
}
