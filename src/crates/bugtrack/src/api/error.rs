//! API errors
//!
//! Handlers return [`ApiResult`]. Every error renders as
//! `{"error", "message", "code"}` with a matching status. Storage errors
//! convert through `?`: a missing record is 404, a taken username 409, and a
//! broken collection file 500 with the details kept in the server log.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::DatabaseError;

/// Body of every error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Reason phrase of the status, e.g. "Not Found"
    pub error: String,
    pub message: String,
    /// Stable identifier for clients
    pub code: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Unknown bug or user id
    #[error("{0}")]
    NotFound(String),

    /// Request is well-formed but not allowed, e.g. an admin deleting themselves
    #[error("{0}")]
    BadRequest(String),

    /// Field rules broken: empty title, severity out of range, empty update
    #[error("{0}")]
    ValidationError(String),

    /// Username already registered
    #[error("{0}")]
    Conflict(String),

    /// No valid session
    #[error("{0}")]
    Unauthorized(String),

    /// Session lacks the rights for this bug or route
    #[error("{0}")]
    Forbidden(String),

    /// Body is not JSON of the expected shape
    #[error("Malformed JSON body: {0}")]
    JsonError(String),

    #[error(transparent)]
    Storage(#[from] DatabaseError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::JsonError(_) => StatusCode::BAD_REQUEST,
            ApiError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Storage(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            ApiError::Storage(e) if e.is_constraint_violation() => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ValidationError(_) => "VALIDATION_ERROR",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::JsonError(_) => "JSON_ERROR",
            ApiError::Storage(e) if e.is_not_found() => "NOT_FOUND",
            ApiError::Storage(e) if e.is_constraint_violation() => "CONFLICT",
            ApiError::Storage(_) => "STORAGE_ERROR",
        }
    }

    fn to_body(&self) -> ApiErrorResponse {
        let status = self.status_code();
        let message = if status.is_server_error() {
            "bug storage is unavailable".to_string()
        } else {
            self.to_string()
        };

        ApiErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            code: self.code().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("API error: {}", self);
        } else {
            tracing::warn!("API error {}: {}", status.as_u16(), self);
        }

        (status, Json(self.to_body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::JsonError(rejection.body_text())
    }
}
