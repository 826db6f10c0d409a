//! Common error types and the JSON error envelope for the Coffee Shop API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for non-authorization API failures
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("unprocessable: {0}")]
    Unprocessable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the appropriate HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Unexpected(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Unexpected(_) => "unexpected_error",
            Error::Validation(_) => "validation_error",
            Error::NotFound(_) => "not_found",
            Error::Unprocessable(_) => "unprocessable",
            Error::Internal(_) => "internal_error",
        }
    }
}

/// Build the error envelope every failed request is rendered with:
/// `{"success": false, "error": <status>, "code": <code>, "message": <text>}`.
pub fn error_body(status: StatusCode, code: &str, message: &str) -> Json<Value> {
    Json(json!({
        "success": false,
        "error": status.as_u16(),
        "code": code,
        "message": message,
    }))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Internal server error");
        }

        let body = error_body(status, self.error_code(), &self.to_string());
        (status, body).into_response()
    }
}
