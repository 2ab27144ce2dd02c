//! Request body extraction helpers.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body extraction, mapping rejections (malformed JSON,
/// wrong content type, oversized body) to a client error before any
/// validation or storage access happens.
pub fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(ApiError::BadRequest(format!(
            "malformed request body: {rejection}"
        ))),
    }
}
