//! Builders for hand-crafted access tokens
//!
//! The service only ever issues well-formed tokens. These builders produce
//! the odd ones (expired, future-dated, foreign-keyed, wrong algorithm) that
//! the verification path has to reject.

use crate::crypto_fixtures::{test_signing_key, FixtureError};
use auth_service::crypto::Claims;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Builder for access token claims
///
/// # Example
/// ```rust,ignore
/// let token = TestClaimsBuilder::new(111)
///     .expired()
///     .sign_with_seed(TEST_KEY_SEED)?;
/// ```
pub struct TestClaimsBuilder {
    sub: String,
    user_id: Option<i64>,
    fullname: String,
    role: i32,
    iat: i64,
    exp: i64,
}

impl TestClaimsBuilder {
    /// Claims for `user_id`, issued now and valid for one hour
    pub fn new(user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id.to_string(),
            user_id: Some(user_id),
            fullname: format!("Test Employee {user_id}"),
            role: 1,
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        }
    }

    pub fn with_role(mut self, role: i32) -> Self {
        self.role = role;
        self
    }

    pub fn with_fullname(mut self, fullname: &str) -> Self {
        self.fullname = fullname.to_string();
        self
    }

    /// Drop the `user_id` claim, leaving only `sub`
    pub fn without_user_id(mut self) -> Self {
        self.user_id = None;
        self
    }

    /// Expired one hour ago
    pub fn expired(mut self) -> Self {
        let now = Utc::now();
        self.iat = (now - Duration::hours(2)).timestamp();
        self.exp = (now - Duration::hours(1)).timestamp();
        self
    }

    /// Issued `seconds` in the future
    pub fn issued_in_future(mut self, seconds: i64) -> Self {
        let iat = Utc::now() + Duration::seconds(seconds);
        self.iat = iat.timestamp();
        self.exp = (iat + Duration::hours(1)).timestamp();
        self
    }

    pub fn build(self) -> Claims {
        Claims {
            sub: self.sub,
            user_id: self.user_id,
            fullname: self.fullname,
            role: self.role,
            iat: self.iat,
            exp: self.exp,
        }
    }

    /// Sign as EdDSA with the deterministic key for `seed`
    pub fn sign_with_seed(self, seed: u8) -> Result<String, FixtureError> {
        let key = test_signing_key(seed)?;
        let encoding_key = EncodingKey::from_ed_der(&key.pkcs8_der);
        sign(Algorithm::EdDSA, &encoding_key, &self.build())
    }

    /// Sign as HS256 with a shared secret
    pub fn sign_hs256(self, secret: &str) -> Result<String, FixtureError> {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        sign(Algorithm::HS256, &encoding_key, &self.build())
    }
}

fn sign(algorithm: Algorithm, key: &EncodingKey, claims: &Claims) -> Result<String, FixtureError> {
    let mut header = Header::new(algorithm);
    header.typ = Some("JWT".to_string());
    encode(&header, claims, key)
        .map_err(|e| FixtureError::Crypto(format!("Failed to sign test token: {}", e)))
}
