//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error bodies so every
//! endpoint reports failures the same way:
//!
//! ```json
//! { "error": "A lesson already exists for this day and period (...)", "existing": { ... } }
//! ```
//!
//! `existing` is only present for conflicts detected against the local store.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use schooldesk_core::errors::SchoolError;

/// Application error wrapper that provides HTTP status code mapping
#[derive(Debug)]
pub struct AppError(pub SchoolError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            SchoolError::NotFound(_) => StatusCode::NOT_FOUND,
            SchoolError::Conflict { .. } => StatusCode::CONFLICT,
            SchoolError::Validation(_) => StatusCode::BAD_REQUEST,
            SchoolError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SchoolError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self.0);
        }

        let message = self.0.to_string();
        let body = match self.0 {
            SchoolError::Conflict {
                existing: Some(existing),
                ..
            } => json!({ "error": message, "existing": existing }),
            _ => json!({ "error": message }),
        };

        (status, Json(body)).into_response()
    }
}

/// Allows `?` on `SchoolResult` inside handlers
impl From<SchoolError> for AppError {
    fn from(err: SchoolError) -> Self {
        AppError(err)
    }
}

/// Repository failures surface as database errors
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(SchoolError::Database(err))
    }
}

/// Maps a SchoolError to an HTTP response
pub fn map_error(err: SchoolError) -> Response {
    AppError(err).into_response()
}
