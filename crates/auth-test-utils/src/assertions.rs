//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for access tokens. These only inspect the
//! token; signature checks belong to `TokenCodec`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::Utc;
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

/// Access token claims as seen on the wire
#[derive(Debug, Deserialize)]
struct JwtClaims {
    pub sub: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub role: i32,
    pub iat: i64,
    pub exp: i64,
}

/// Custom assertions for issued access tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_subject("111")
///     .assert_has_role(3);
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a well-formed EdDSA JWT
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token is for the specified subject
    fn assert_for_subject(&self, subject: &str) -> &Self;

    /// Assert that the token carries the specified role
    fn assert_has_role(&self, role: i32) -> &Self;

    /// Assert that the token expires within the specified seconds
    fn assert_expires_in(&self, seconds: u64) -> &Self;
}

fn decode_segment<T: for<'de> Deserialize<'de>>(token: &str, index: usize, what: &str) -> T {
    let segment = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("JWT is missing its {what} segment"));
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .unwrap_or_else(|e| panic!("Failed to base64 decode JWT {what}: {e}"));
    serde_json::from_slice(&bytes).unwrap_or_else(|e| panic!("Failed to parse JWT {what}: {e}"))
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        let header: JwtHeader = decode_segment(self, 0, "header");
        assert_eq!(header.alg, "EdDSA", "Expected EdDSA algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        let claims: JwtClaims = decode_segment(self, 1, "payload");
        assert!(!claims.sub.is_empty(), "Subject must not be empty");
        assert!(claims.exp > claims.iat, "exp must be after iat");

        assert!(
            !parts[2].is_empty(),
            "JWT signature segment must not be empty"
        );

        self
    }

    fn assert_for_subject(&self, subject: &str) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1, "payload");
        assert_eq!(claims.sub, subject, "Token subject mismatch");
        assert_eq!(
            claims.user_id.map(|id| id.to_string()).as_deref(),
            Some(subject),
            "user_id claim must match subject"
        );
        self
    }

    fn assert_has_role(&self, role: i32) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1, "payload");
        assert_eq!(claims.role, role, "Token role mismatch");
        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let claims: JwtClaims = decode_segment(self, 1, "payload");
        let remaining = claims.exp - Utc::now().timestamp();
        let expected = i64::try_from(seconds).unwrap_or(i64::MAX);
        assert!(remaining > 0, "Token already expired");
        assert!(
            remaining <= expected,
            "Token expires in {remaining}s, expected at most {expected}s"
        );
        self
    }
}
