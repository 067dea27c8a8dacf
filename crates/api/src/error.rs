//! API error types with HTTP response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, ErrorKind};
use thiserror::Error;

use crate::response::Envelope;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database connection or pool error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure.
    #[error("migration error: {0}")]
    Migration(#[from] document_store::StoreError),

    /// Prometheus recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Request body or path could not be decoded.
    BadRequest(String),
    /// The inbound brand queue is full.
    Unavailable(String),
    /// Mutation rejected or failed in the domain layer.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Envelope::failure(message, Vec::new()))
            }
            ApiError::Unavailable(message) => (
                StatusCode::SERVICE_UNAVAILABLE,
                Envelope::failure(message, Vec::new()),
            ),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        (status, Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, Envelope) {
    match err.kind() {
        ErrorKind::ValidationFailed => {
            let errors = match err {
                DomainError::ValidationFailed(errors) => errors.into_vec(),
                _ => Vec::new(),
            };
            (
                StatusCode::BAD_REQUEST,
                Envelope::failure("Provide valid Payload", errors),
            )
        }
        ErrorKind::NoUpdates => (
            StatusCode::BAD_REQUEST,
            Envelope::failure("No updates found", Vec::new()),
        ),
        ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            Envelope::failure(err.to_string(), Vec::new()),
        ),
        ErrorKind::ConcurrentModification => (
            StatusCode::CONFLICT,
            Envelope::failure("Version conflict", Vec::new()),
        ),
        ErrorKind::Unexpected => {
            tracing::error!(error = %err, "internal server error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Envelope::failure("Internal Server Error", Vec::new()),
            )
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}
