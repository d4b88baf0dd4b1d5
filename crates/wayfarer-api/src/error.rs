//! Wayfarer: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use wayfarer_core::error::DomainError;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The ephemeral store could not be reached at startup.
    #[error("ephemeral store error: {0}")]
    Ephemeral(DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),

    /// The span exporter could not be built.
    #[error("telemetry error: {0}")]
    Telemetry(String),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::DuplicateIdentity { .. } => (StatusCode::CONFLICT, "duplicate_identity"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::NotInLocation(_) => (StatusCode::BAD_REQUEST, "not_in_location"),
            DomainError::AuthFailure => (StatusCode::UNAUTHORIZED, "auth_failure"),
            DomainError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            DomainError::Unimplemented(_) => (StatusCode::NOT_IMPLEMENTED, "unimplemented"),
            DomainError::StoreConnection(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable")
            }
            DomainError::StoreOperation(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "store_operation_failed")
            }
            DomainError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
