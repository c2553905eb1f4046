//! Observability for the authentication service.
//!
//! # Privacy by Default
//!
//! Instrumented functions use `#[instrument(skip_all)]` and record only
//! explicitly allow-listed fields:
//! - **SAFE**: error reasons, algorithm names, status labels
//! - **HASHED**: Telegram/employee ids, via [`hash_for_correlation`]
//! - **NEVER**: bot token, signing keys, issued tokens, names

pub mod metrics;

use ring::digest;

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// Used for employee ids that need correlation across log entries but
/// should not be stored in plaintext. This is a correlation aid, not a
/// secret-protection mechanism.
pub fn hash_for_correlation(value: &str) -> String {
    let result = digest::digest(&digest::SHA256, value.as_bytes());
    // First 4 bytes (8 hex chars): enough for correlation, limits reversibility
    hex::encode(result.as_ref().get(..4).unwrap_or_default())
}

/// Error categories for metrics labels (bounded cardinality)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or rejected credentials, unknown principal
    Authentication,
    /// Known principal without the required role
    Authorization,
    /// Token structure, signature, algorithm or lifetime problems
    Cryptographic,
    /// Database, key material, system
    Internal,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Authentication => "authentication",
            ErrorCategory::Authorization => "authorization",
            ErrorCategory::Cryptographic => "cryptographic",
            ErrorCategory::Internal => "internal",
        }
    }
}

impl From<&crate::errors::AuthError> for ErrorCategory {
    fn from(err: &crate::errors::AuthError) -> Self {
        use crate::errors::AuthError;
        match err {
            AuthError::MalformedPayload(_)
            | AuthError::InvalidSignature
            | AuthError::AssertionExpired
            | AuthError::MissingCredentials
            | AuthError::Unauthorized => ErrorCategory::Authentication,
            AuthError::InsufficientRole => ErrorCategory::Authorization,
            AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::UnsupportedAlgorithm
            | AuthError::TokenNotYetValid => ErrorCategory::Cryptographic,
            AuthError::KeyMaterialUnavailable(_) | AuthError::Database(_) | AuthError::Internal => {
                ErrorCategory::Internal
            }
        }
    }
}
