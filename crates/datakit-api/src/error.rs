//! API error type.
//!
//! Maps the error taxonomy — not-found, unsupported resource type, schema
//! validation failure, malformed body — onto HTTP responses with
//! structured JSON bodies. Each kind is a distinct variant so handlers
//! never string-match messages to pick a status code. Internal error
//! messages are logged, never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use datakit_schema::SchemaError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type implementing [`IntoResponse`].
#[derive(Error, Debug)]
pub enum ApiError {
    /// Unknown app, dataset, or resource id (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Resource type matches no schema title in the app (400). The
    /// message enumerates the supported types.
    #[error("{0}")]
    UnsupportedResourceType(String),

    /// Payload did not conform to its resource type's schema (400).
    #[error("{0}")]
    SchemaValidation(String),

    /// Malformed request body, invalid dump type, or rejected schema
    /// list (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::UnsupportedResourceType(_) => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_RESOURCE_TYPE")
            }
            Self::SchemaValidation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Map schema-layer errors to their HTTP classes.
impl From<SchemaError> for ApiError {
    fn from(err: SchemaError) -> Self {
        match &err {
            SchemaError::UnsupportedResourceType { .. } => {
                Self::UnsupportedResourceType(err.to_string())
            }
            SchemaError::Validation { .. } => Self::SchemaValidation(err.to_string()),
            SchemaError::InvalidSchemaList { .. }
            | SchemaError::DuplicateTitle { .. }
            | SchemaError::ReservedTitle { .. }
            | SchemaError::InvalidSchema { .. } => Self::BadRequest(err.to_string()),
        }
    }
}
