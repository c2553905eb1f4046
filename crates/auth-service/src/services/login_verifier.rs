//! Telegram Login Widget assertion verification.
//!
//! The widget signs the login payload with HMAC-SHA256 keyed by
//! `SHA256(bot_token)`. Verification is local: no request to Telegram is made.

use crate::errors::AuthError;
use crate::models::TelegramLoginAssertion;
use common::secret::{ExposeSecret, SecretString};
use ring::{digest, hmac};
use std::fmt;
use std::time::Duration;
use tracing::instrument;

/// Verifies authenticity and freshness of login assertions.
///
/// Holds only the derived HMAC key; the bot token itself is not retained.
pub struct LoginAssertionVerifier {
    key: hmac::Key,
    max_age_secs: i64,
}

impl fmt::Debug for LoginAssertionVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginAssertionVerifier")
            .field("key", &"[REDACTED]")
            .field("max_age_secs", &self.max_age_secs)
            .finish()
    }
}

impl LoginAssertionVerifier {
    pub fn new(bot_token: &SecretString, max_age: Duration) -> Self {
        let secret = digest::digest(&digest::SHA256, bot_token.expose_secret().as_bytes());
        Self {
            key: hmac::Key::new(hmac::HMAC_SHA256, secret.as_ref()),
            max_age_secs: i64::try_from(max_age.as_secs()).unwrap_or(i64::MAX),
        }
    }

    /// Verify an assertion against the current time.
    ///
    /// Returns the verified Telegram account id.
    #[instrument(skip_all)]
    pub fn verify(&self, assertion: &TelegramLoginAssertion) -> Result<i64, AuthError> {
        self.verify_at(assertion, chrono::Utc::now().timestamp())
    }

    /// Verify an assertion against an explicit `now` (unix seconds).
    ///
    /// The signature is checked before `id` and `auth_date` are interpreted,
    /// so an unsigned payload never reaches the 400 path.
    pub fn verify_at(&self, assertion: &TelegramLoginAssertion, now: i64) -> Result<i64, AuthError> {
        let data_check_string = assertion.data_check_string();

        let provided = hex::decode(&assertion.hash).map_err(|e| {
            tracing::debug!(target: "auth.login", error = %e, "Assertion hash is not valid hex");
            AuthError::InvalidSignature
        })?;

        // Constant-time comparison
        hmac::verify(&self.key, data_check_string.as_bytes(), &provided).map_err(|_| {
            tracing::debug!(target: "auth.login", "Assertion hash mismatch");
            AuthError::InvalidSignature
        })?;

        let telegram_id = assertion
            .id
            .value()
            .ok_or_else(|| AuthError::MalformedPayload("id must be an integer".to_string()))?;

        let auth_date = assertion.auth_date.timestamp().ok_or_else(|| {
            AuthError::MalformedPayload("auth_date must be an integer".to_string())
        })?;

        let age = now.saturating_sub(auth_date);
        if age > self.max_age_secs {
            tracing::debug!(
                target: "auth.login",
                age_secs = age,
                max_age_secs = self.max_age_secs,
                "Assertion expired"
            );
            return Err(AuthError::AssertionExpired);
        }

        Ok(telegram_id)
    }
}
