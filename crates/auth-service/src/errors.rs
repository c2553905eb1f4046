//! Authentication service error types.
//!
//! The `IntoResponse` impl is the single place internal failure kinds are
//! collapsed into client-facing responses. Every authentication failure looks
//! the same on the wire; the specific kind is only logged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Authentication service error type.
///
/// Maps to HTTP status codes:
/// - MalformedPayload: 400 Bad Request
/// - InsufficientRole: 403 Forbidden
/// - KeyMaterialUnavailable, Database, Internal: 500 Internal Server Error
/// - everything else: 401 Unauthorized
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Malformed login payload: {0}")]
    MalformedPayload(String),

    #[error("Login assertion signature mismatch")]
    InvalidSignature,

    #[error("Login assertion expired")]
    AssertionExpired,

    #[error("Missing bearer credentials")]
    MissingCredentials,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Unsupported token algorithm")]
    UnsupportedAlgorithm,

    #[error("Token issued in the future")]
    TokenNotYetValid,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Insufficient role")]
    InsufficientRole,

    #[error("Key material unavailable: {0}")]
    KeyMaterialUnavailable(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    /// Returns the HTTP status code for this error (for metrics recording).
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MalformedPayload(_) => 400,
            AuthError::InsufficientRole => 403,
            AuthError::KeyMaterialUnavailable(_) | AuthError::Database(_) | AuthError::Internal => {
                500
            }
            AuthError::InvalidSignature
            | AuthError::AssertionExpired
            | AuthError::MissingCredentials
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::UnsupportedAlgorithm
            | AuthError::TokenNotYetValid
            | AuthError::Unauthorized => 401,
        }
    }

    /// Bounded label for metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MalformedPayload(_) => "malformed_payload",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::AssertionExpired => "assertion_expired",
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::MalformedToken => "malformed_token",
            AuthError::TokenExpired => "token_expired",
            AuthError::UnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::TokenNotYetValid => "token_not_yet_valid",
            AuthError::Unauthorized => "unauthorized",
            AuthError::InsufficientRole => "insufficient_role",
            AuthError::KeyMaterialUnavailable(_) => "key_material_unavailable",
            AuthError::Database(_) => "database",
            AuthError::Internal => "internal",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::MalformedPayload(detail) => {
                tracing::debug!(target: "auth.errors", detail = %detail, "Rejected malformed payload");
                (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "Invalid authentication payload",
                )
            }
            AuthError::InsufficientRole => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Insufficient permissions",
            ),
            AuthError::KeyMaterialUnavailable(detail) => {
                tracing::error!(target: "auth.errors", detail = %detail, "Key material unavailable");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred",
                )
            }
            AuthError::Database(err) => {
                // Log actual error server-side, return generic message to client
                tracing::error!(target: "auth.errors", error = %err, "Database operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "An internal database error occurred",
                )
            }
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred",
            ),
            AuthError::InvalidSignature
            | AuthError::AssertionExpired
            | AuthError::MissingCredentials
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::UnsupportedAlgorithm
            | AuthError::TokenNotYetValid
            | AuthError::Unauthorized => {
                tracing::debug!(target: "auth.errors", reason = self.reason(), "Authentication failed");
                (
                    StatusCode::UNAUTHORIZED,
                    "UNAUTHORIZED",
                    "Invalid authentication credentials",
                )
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message: message.to_string(),
            },
        };

        let mut response = (status, Json(error_response)).into_response();

        // Add WWW-Authenticate header for 401 responses
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(header_value) = "Bearer realm=\"stp\"".parse() {
                response
                    .headers_mut()
                    .insert("WWW-Authenticate", header_value);
            }
        }

        response
    }
}

/// Convert sqlx errors to AuthError
impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Database(err.to_string())
    }
}
