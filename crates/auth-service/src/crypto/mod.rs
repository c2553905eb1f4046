//! Access token encoding and verification.
//!
//! [`TokenCodec`] is the only producer of trusted [`Claims`]: a `Claims`
//! value obtained any other way (deserialized from a request, built by hand)
//! carries no authority.

pub mod keys;

use crate::errors::AuthError;
use crate::models::Employee;
use common::jwt::{extract_alg, validate_iat, JwtValidationError};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Header, Validation};
use keys::{KeyMaterial, SigningAlgorithm};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::instrument;

/// Access token claims.
///
/// `sub` and `fullname` identify a person and are redacted from Debug output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Employee user_id as a string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub fullname: String,
    pub role: i32,
    pub iat: i64, // Issued at timestamp
    pub exp: i64, // Expiration timestamp
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("user_id", &self.user_id)
            .field("fullname", &"[REDACTED]")
            .field("role", &self.role)
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

impl Claims {
    /// Claims for an employee, valid from `now` for `ttl`.
    pub fn for_employee(employee: &Employee, now: i64, ttl: Duration) -> Self {
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        Self {
            sub: employee.user_id.to_string(),
            user_id: Some(employee.user_id),
            fullname: employee.fullname.clone(),
            role: employee.role,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        }
    }
}

/// Signs and verifies access tokens with a single configured algorithm.
#[derive(Debug)]
pub struct TokenCodec {
    keys: KeyMaterial,
    access_token_ttl: Duration,
    clock_skew: Duration,
}

impl TokenCodec {
    pub fn new(keys: KeyMaterial, access_token_ttl: Duration, clock_skew: Duration) -> Self {
        Self {
            keys,
            access_token_ttl,
            clock_skew,
        }
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.keys.algorithm()
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    /// Issue an access token for an employee, starting now.
    #[instrument(skip_all)]
    pub fn issue(&self, employee: &Employee) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp();
        self.encode(&Claims::for_employee(
            employee,
            now,
            self.access_token_ttl,
        ))
    }

    /// Sign claims into a compact JWT.
    #[instrument(skip_all)]
    pub fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        let mut header = Header::new(self.algorithm().jwt_algorithm());
        header.typ = Some("JWT".to_string());

        encode(&header, claims, self.keys.encoding_key()).map_err(|e| {
            tracing::error!(target: "auth.crypto", error = %e, "JWT signing operation failed");
            AuthError::Internal
        })
    }

    /// Verify a compact JWT and return its claims.
    ///
    /// Validates, in order:
    /// - Token size (must be <= `MAX_JWT_SIZE_BYTES`) and JWT structure
    /// - Header `alg` equals the configured algorithm (before any signature work)
    /// - Signature
    /// - `exp` in the future, no leeway
    /// - `iat` not further in the future than the clock skew tolerance
    #[instrument(skip_all)]
    pub fn decode(&self, token: &str) -> Result<Claims, AuthError> {
        let expected = self.algorithm();

        let alg = extract_alg(token).map_err(|e| match e {
            JwtValidationError::MissingAlgorithm => AuthError::UnsupportedAlgorithm,
            JwtValidationError::TokenTooLarge
            | JwtValidationError::MalformedToken
            | JwtValidationError::IatTooFarInFuture => AuthError::MalformedToken,
        })?;

        if alg != expected.as_str() {
            tracing::debug!(
                target: "auth.crypto",
                expected = expected.as_str(),
                "Token rejected: algorithm not allowed"
            );
            return Err(AuthError::UnsupportedAlgorithm);
        }

        let mut validation = Validation::new(expected.jwt_algorithm());
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, self.keys.decoding_key(), &validation).map_err(|e| {
                tracing::debug!(target: "auth.crypto", error = %e, "Token verification failed");
                map_jwt_error(e.kind())
            })?;

        validate_iat(token_data.claims.iat, self.clock_skew)
            .map_err(|_| AuthError::TokenNotYetValid)?;

        Ok(token_data.claims)
    }
}

fn map_jwt_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::Base64(_) | ErrorKind::Crypto(_) => {
            AuthError::InvalidSignature
        }
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => AuthError::UnsupportedAlgorithm,
        ErrorKind::InvalidEcdsaKey | ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat => {
            AuthError::KeyMaterialUnavailable("Verification key rejected by backend".to_string())
        }
        _ => AuthError::MalformedToken,
    }
}
