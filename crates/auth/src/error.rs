//! Authorization errors
//!
//! Every failure the gate can produce is a distinct variant so the HTTP
//! layer can tell 401, 403, 400 and 500 apart. Errors are rendered verbatim
//! with the shared `coffeeshop_common::error_body` envelope.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use coffeeshop_common::error_body;

/// Authorization failure
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    AuthorizationHeaderMissing,

    /// Malformed header, bad token structure, unsupported algorithm or unknown `kid`
    #[error("{0}")]
    InvalidHeader(String),

    #[error("Token signature could not be verified.")]
    InvalidSignature,

    #[error("Token expired.")]
    TokenExpired,

    /// Audience or issuer mismatch, or a payload that does not hold the expected claims
    #[error("{0}")]
    InvalidClaims(String),

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    Unauthorized { required: String },

    #[error("Unable to fetch signing keys: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    pub(crate) fn invalid_header(message: impl Into<String>) -> Self {
        AuthError::InvalidHeader(message.into())
    }

    pub(crate) fn invalid_claims(message: impl Into<String>) -> Self {
        AuthError::InvalidClaims(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::AuthorizationHeaderMissing
            | AuthError::InvalidHeader(_)
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            AuthError::PermissionsMissing => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            AuthError::KeySetUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine code rendered in the `code` field
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::AuthorizationHeaderMissing => "authorization_header_missing",
            AuthError::InvalidHeader(_) => "invalid_header",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims(_) | AuthError::PermissionsMissing => "invalid_claims",
            AuthError::Unauthorized { .. } => "unauthorized",
            AuthError::KeySetUnavailable(_) => "key_set_unavailable",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Authorization could not complete");
        }

        let body = error_body(status, self.error_code(), &self.to_string());
        (status, body).into_response()
    }
}
