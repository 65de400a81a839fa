//! Error handling for the Greenlight control API
//!
//! Maps engine error kinds to transport status codes and safe,
//! non-leaking messages: validation failures are 400, a missing instance
//! is 404, lifecycle conflicts are 409, and anything unexpected is a
//! generic 500.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use tracing::error;

use greenlight_core::CoreError;

/// Message returned for errors that must not leak detail to clients
const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

/// API error wrapper carrying the typed engine error to the boundary
#[derive(Debug)]
pub struct ApiError(pub CoreError);

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    /// The transport status this error maps to
    pub fn status_code(&self) -> StatusCode {
        if self.0.is_conflict() {
            return StatusCode::CONFLICT;
        }
        match &self.0 {
            CoreError::InvalidInput(_)
            | CoreError::EmailValidationFailed(_)
            | CoreError::InvalidApprovalEvent(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "unexpected error handling control API request");
            UNEXPECTED_ERROR_MESSAGE.to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
