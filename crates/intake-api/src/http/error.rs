//! Application error type mapping to HTTP status codes and the envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use intake_types::error::{RepositoryError, TransportError};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Outbound delivery failed on a manual send.
    Transport(TransportError),
    /// Session or transcript storage failed.
    Repository(RepositoryError),
    /// Webhook signature missing or wrong.
    Unauthorized(String),
    /// Malformed request.
    Validation(String),
}

impl From<TransportError> for AppError {
    fn from(e: TransportError) -> Self {
        AppError::Transport(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Transport(e) => (StatusCode::BAD_GATEWAY, "TRANSPORT_ERROR", e.to_string()),
            AppError::Repository(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", e.to_string())
            }
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        let mut response =
            ApiResponse::error(code, &message, uuid::Uuid::now_v7().to_string(), 0).into_response();
        *response.status_mut() = status;
        response
    }
}
