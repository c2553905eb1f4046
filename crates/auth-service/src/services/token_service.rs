//! Telegram login flow: verify assertion, resolve employee, gate on role,
//! issue an access token.

use crate::crypto::TokenCodec;
use crate::errors::AuthError;
use crate::models::{TelegramLoginAssertion, TokenResponse};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::{
    record_login_attempt, record_login_duration, record_token_issuance,
};
use crate::services::login_verifier::LoginAssertionVerifier;
use crate::services::user_directory::UserDirectory;
use std::time::Instant;
use tracing::instrument;

/// Exchange a verified Telegram login assertion for an access token.
///
/// Only employees holding `required_role` may log in this way. Bearer-token
/// authentication on other routes does not apply this gate.
#[instrument(skip_all)]
pub async fn login_with_telegram(
    verifier: &LoginAssertionVerifier,
    directory: &dyn UserDirectory,
    codec: &TokenCodec,
    required_role: i32,
    assertion: &TelegramLoginAssertion,
) -> Result<TokenResponse, AuthError> {
    let start = Instant::now();
    let result = login(verifier, directory, codec, required_role, assertion).await;

    let status = if result.is_ok() { "success" } else { "error" };
    record_login_duration(status, start.elapsed());
    match &result {
        Ok(_) => record_login_attempt(status, "none"),
        Err(e) => record_login_attempt(status, e.reason()),
    }

    result
}

async fn login(
    verifier: &LoginAssertionVerifier,
    directory: &dyn UserDirectory,
    codec: &TokenCodec,
    required_role: i32,
    assertion: &TelegramLoginAssertion,
) -> Result<TokenResponse, AuthError> {
    let subject = hash_for_correlation(&assertion.id.as_check_value());

    let telegram_id = verifier.verify(assertion).map_err(|e| {
        tracing::debug!(target: "auth.login", subject = %subject, reason = e.reason(), "Login assertion rejected");
        e
    })?;

    let employee = directory
        .lookup_user_by_id(telegram_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(target: "auth.login", subject = %subject, "No employee for login assertion");
            AuthError::Unauthorized
        })?;

    if employee.role != required_role {
        tracing::debug!(
            target: "auth.login",
            subject = %subject,
            role = employee.role,
            required_role = required_role,
            "Employee role not allowed to log in"
        );
        return Err(AuthError::InsufficientRole);
    }

    let access_token = codec.issue(&employee).map_err(|e| {
        record_token_issuance("error");
        e
    })?;
    record_token_issuance("success");

    tracing::info!(target: "auth.login", subject = %subject, "Access token issued");

    Ok(TokenResponse::bearer(
        access_token,
        codec.access_token_ttl().as_secs(),
    ))
}
