// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// User-correctable: a field failed the positivity/finiteness check.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Persisted workouts could not be parsed or failed model invariants.
    #[error("Corrupt workout store: {0}")]
    CorruptStore(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("No location has been picked")]
    NotAwaitingInput,

    #[error("Duplicate workout id: {0}")]
    DuplicateId(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Machine-readable error code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::CorruptStore(_) => "corrupt_store",
            AppError::LocationUnavailable(_) => "location_unavailable",
            AppError::NotAwaitingInput => "not_awaiting_input",
            AppError::DuplicateId(_) => "duplicate_id",
            AppError::Storage(_) => "storage_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LocationUnavailable(_)
            | AppError::NotAwaitingInput
            | AppError::DuplicateId(_) => StatusCode::CONFLICT,
            AppError::CorruptStore(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = match &self {
            AppError::InvalidInput(msg)
            | AppError::LocationUnavailable(msg)
            | AppError::DuplicateId(msg) => Some(msg.clone()),
            AppError::NotAwaitingInput => None,
            AppError::CorruptStore(msg) => {
                tracing::error!(error = %msg, "Corrupt store surfaced to client");
                None
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                None
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                None
            }
        };

        let body = ErrorResponse {
            error: self.code().to_string(),
            details,
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
