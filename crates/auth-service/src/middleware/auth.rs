//! Authentication middleware for protected routes.
//!
//! Extracts the bearer token, verifies it with the [`TokenCodec`], resolves
//! the employee through the [`UserDirectory`] and injects the [`Employee`]
//! into request extensions.

use crate::crypto::TokenCodec;
use crate::errors::AuthError;
use crate::models::Employee;
use crate::observability::metrics::record_token_validation;
use crate::observability::{hash_for_correlation, ErrorCategory};
use crate::services::user_directory::UserDirectory;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub codec: Arc<TokenCodec>,
    pub directory: Arc<dyn UserDirectory>,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively. Missing header, other schemes
/// and empty tokens all yield `MissingCredentials`.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            tracing::debug!(target: "auth.middleware", "Missing Authorization header");
            AuthError::MissingCredentials
        })?;

    let (scheme, token) = value.trim().split_once(' ').ok_or_else(|| {
        tracing::debug!(target: "auth.middleware", "Invalid Authorization header format");
        AuthError::MissingCredentials
    })?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        tracing::debug!(target: "auth.middleware", "Invalid Authorization header format");
        return Err(AuthError::MissingCredentials);
    }

    Ok(token)
}

/// Resolve the request principal from its bearer token.
///
/// Token failures are logged with their specific kind and surfaced as
/// `Unauthorized`. A directory outage surfaces as `Database`.
#[instrument(skip_all)]
pub async fn authenticate(
    headers: &HeaderMap,
    codec: &TokenCodec,
    directory: &dyn UserDirectory,
) -> Result<Employee, AuthError> {
    let result = resolve_principal(headers, codec, directory).await;

    match &result {
        Ok(_) => record_token_validation("success", None),
        Err(e) => record_token_validation("error", Some(ErrorCategory::from(e).as_str())),
    }

    result
}

async fn resolve_principal(
    headers: &HeaderMap,
    codec: &TokenCodec,
    directory: &dyn UserDirectory,
) -> Result<Employee, AuthError> {
    let token = extract_bearer(headers)?;

    let claims = codec.decode(token).map_err(|e| {
        tracing::debug!(target: "auth.middleware", reason = e.reason(), "Bearer token rejected");
        AuthError::Unauthorized
    })?;

    let user_id = claims.user_id.filter(|id| *id > 0).ok_or_else(|| {
        tracing::debug!(target: "auth.middleware", "Token carries no usable user_id");
        AuthError::Unauthorized
    })?;

    directory.lookup_user_by_id(user_id).await?.ok_or_else(|| {
        tracing::debug!(
            target: "auth.middleware",
            subject = %hash_for_correlation(&user_id.to_string()),
            "Token subject no longer in directory"
        );
        AuthError::Unauthorized
    })
}

/// Authentication middleware for protected routes.
///
/// # Authorization Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Response
///
/// - Returns 401 Unauthorized with WWW-Authenticate header if the token is missing or invalid
/// - Continues to next handler with the `Employee` in extensions otherwise
#[instrument(skip(state, req, next), name = "auth.middleware.require_auth")]
pub async fn require_auth(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthError> {
    let employee = authenticate(req.headers(), &state.codec, state.directory.as_ref()).await?;

    req.extensions_mut().insert(employee);

    Ok(next.run(req).await)
}
