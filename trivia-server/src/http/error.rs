//! API error types with IntoResponse
//!
//! Four kinds, each a fixed status + message pair rendered as
//! `{"success": false, "error": <code>, "message": <message>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DbError;
use crate::models::ValidationError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Missing or invalid required input (400)
    BadRequest { reason: String },

    /// Missing id, page or category (404)
    NotFound { resource: &'static str, id: String },

    /// Store failures and anything else a handler couldn't complete (422, logged)
    Unprocessable { reason: String },

    /// Faults outside handler control, e.g. panics (500, logged)
    Internal { message: String },
}

/// Error envelope shared by every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: &'static str,
}

impl ApiError {
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::BadRequest {
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        Self::Unprocessable {
            reason: reason.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message; never carries internal detail.
    pub fn message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "Bad request",
            Self::NotFound { .. } => "Resource not found",
            Self::Unprocessable { .. } => "Unprocessable entity",
            Self::Internal { .. } => "Internal server error",
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.status().as_u16(),
            message: self.message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::BadRequest { reason } => tracing::debug!("Bad request: {}", reason),
            Self::NotFound { resource, id } => {
                tracing::debug!("Not found: {} '{}'", resource, id)
            }
            // Log the actual error, return generic message
            Self::Unprocessable { reason } => tracing::error!("Unprocessable: {}", reason),
            Self::Internal { message } => tracing::error!("Internal error: {}", message),
        }

        (self.status(), Json(self.body())).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::BadRequest {
            reason: e.to_string(),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Unprocessable {
                reason: other.to_string(),
            },
        }
    }
}
