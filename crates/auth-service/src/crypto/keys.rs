//! Signing key material.
//!
//! Keys are loaded once at startup and never change for the lifetime of the
//! process. Every constructor finishes with a sign-then-verify self-check so a
//! mismatched private/public pair fails startup instead of failing every
//! request.

use crate::config::Config;
use crate::errors::AuthError;
use common::secret::{ExposeSecret, SecretString};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::signature::{Ed25519KeyPair, KeyPair};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::instrument;

/// Minimum HS256 secret length in bytes (the HMAC-SHA256 output size).
pub const MIN_HMAC_SECRET_BYTES: usize = 32;

/// Token signing algorithms the service can be configured with.
///
/// Exactly one is active per deployment and it is the only algorithm accepted
/// on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// Ed25519 (default).
    EdDSA,
    /// ECDSA P-256 with SHA-256.
    ES256,
    /// RSASSA-PKCS1-v1_5 with SHA-256.
    RS256,
    /// HMAC-SHA256 with a shared secret.
    HS256,
}

impl SigningAlgorithm {
    /// Name as it appears in the JWT header `alg` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::EdDSA => "EdDSA",
            SigningAlgorithm::ES256 => "ES256",
            SigningAlgorithm::RS256 => "RS256",
            SigningAlgorithm::HS256 => "HS256",
        }
    }

    pub fn is_symmetric(&self) -> bool {
        matches!(self, SigningAlgorithm::HS256)
    }

    pub(crate) fn jwt_algorithm(self) -> Algorithm {
        match self {
            SigningAlgorithm::EdDSA => Algorithm::EdDSA,
            SigningAlgorithm::ES256 => Algorithm::ES256,
            SigningAlgorithm::RS256 => Algorithm::RS256,
            SigningAlgorithm::HS256 => Algorithm::HS256,
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SigningAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            SigningAlgorithm::EdDSA,
            SigningAlgorithm::ES256,
            SigningAlgorithm::RS256,
            SigningAlgorithm::HS256,
        ]
        .into_iter()
        .find(|alg| alg.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| format!("unsupported algorithm '{}'", s))
    }
}

/// Loaded signing and verification keys for the configured algorithm.
///
/// Debug is manually implemented so key bytes never reach logs.
pub struct KeyMaterial {
    algorithm: SigningAlgorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("algorithm", &self.algorithm)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl KeyMaterial {
    /// Load the key material described by the service configuration.
    ///
    /// Any failure here is fatal at startup.
    #[instrument(skip_all, fields(algorithm = %config.jwt_algorithm))]
    pub fn load(config: &Config) -> Result<Self, AuthError> {
        if config.jwt_algorithm.is_symmetric() {
            let secret = config.jwt_secret_key.as_ref().ok_or_else(|| {
                AuthError::KeyMaterialUnavailable("JWT_SECRET_KEY is not configured".to_string())
            })?;
            return Self::from_secret(secret);
        }

        match (&config.jwt_private_key_path, &config.jwt_public_key_path) {
            (Some(private_path), Some(public_path)) => {
                Self::from_files(config.jwt_algorithm, private_path, public_path)
            }
            _ => Err(AuthError::KeyMaterialUnavailable(
                "JWT key paths are not configured".to_string(),
            )),
        }
    }

    /// Read a PEM private key (PKCS#8) and PEM public key (SPKI) from disk.
    pub fn from_files(
        algorithm: SigningAlgorithm,
        private_key_path: &Path,
        public_key_path: &Path,
    ) -> Result<Self, AuthError> {
        let private_pem = read_key_file(private_key_path)?;
        let public_pem = read_key_file(public_key_path)?;

        tracing::debug!(
            target: "auth.crypto",
            algorithm = %algorithm,
            private_key_path = %private_key_path.display(),
            public_key_path = %public_key_path.display(),
            "Read JWT key files"
        );

        Self::from_pem(algorithm, &private_pem, &public_pem)
    }

    /// Build key material from PEM-encoded keys.
    pub fn from_pem(
        algorithm: SigningAlgorithm,
        private_pem: &[u8],
        public_pem: &[u8],
    ) -> Result<Self, AuthError> {
        let (encoding_key, decoding_key) = match algorithm {
            SigningAlgorithm::EdDSA => (
                EncodingKey::from_ed_pem(private_pem).map_err(pem_error("private"))?,
                DecodingKey::from_ed_pem(public_pem).map_err(pem_error("public"))?,
            ),
            SigningAlgorithm::ES256 => (
                EncodingKey::from_ec_pem(private_pem).map_err(pem_error("private"))?,
                DecodingKey::from_ec_pem(public_pem).map_err(pem_error("public"))?,
            ),
            SigningAlgorithm::RS256 => (
                EncodingKey::from_rsa_pem(private_pem).map_err(pem_error("private"))?,
                DecodingKey::from_rsa_pem(public_pem).map_err(pem_error("public"))?,
            ),
            SigningAlgorithm::HS256 => {
                return Err(AuthError::KeyMaterialUnavailable(
                    "HS256 uses a shared secret, not PEM keys".to_string(),
                ));
            }
        };

        Self {
            algorithm,
            encoding_key,
            decoding_key,
        }
        .self_checked()
    }

    /// Build HS256 key material from a shared secret.
    pub fn from_secret(secret: &SecretString) -> Result<Self, AuthError> {
        let bytes = secret.expose_secret().as_bytes();
        if bytes.len() < MIN_HMAC_SECRET_BYTES {
            return Err(AuthError::KeyMaterialUnavailable(format!(
                "HS256 secret must be at least {} bytes",
                MIN_HMAC_SECRET_BYTES
            )));
        }

        Self {
            algorithm: SigningAlgorithm::HS256,
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
        }
        .self_checked()
    }

    /// Build EdDSA key material from a PKCS#8 (v1 or v2) DER document.
    ///
    /// The public half is derived with ring, so the pair cannot mismatch.
    pub fn from_ed25519_pkcs8(pkcs8_der: &[u8]) -> Result<Self, AuthError> {
        let key_pair = Ed25519KeyPair::from_pkcs8_maybe_unchecked(pkcs8_der).map_err(|e| {
            AuthError::KeyMaterialUnavailable(format!("Invalid Ed25519 private key: {}", e))
        })?;

        Self {
            algorithm: SigningAlgorithm::EdDSA,
            encoding_key: EncodingKey::from_ed_der(pkcs8_der),
            decoding_key: DecodingKey::from_ed_der(key_pair.public_key().as_ref()),
        }
        .self_checked()
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    /// Sign a probe token and verify it with the decoding key.
    fn self_checked(self) -> Result<Self, AuthError> {
        #[derive(Serialize, Deserialize)]
        struct Probe {
            exp: i64,
        }

        let probe = Probe {
            exp: chrono::Utc::now().timestamp() + 60,
        };
        let alg = self.algorithm.jwt_algorithm();

        let token = encode(&Header::new(alg), &probe, &self.encoding_key).map_err(|e| {
            AuthError::KeyMaterialUnavailable(format!("Signing key is unusable: {}", e))
        })?;

        decode::<Probe>(&token, &self.decoding_key, &Validation::new(alg)).map_err(|e| {
            AuthError::KeyMaterialUnavailable(format!(
                "Verification key does not match signing key: {}",
                e
            ))
        })?;

        tracing::debug!(target: "auth.crypto", algorithm = %self.algorithm, "Key material self-check passed");
        Ok(self)
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, AuthError> {
    std::fs::read(path).map_err(|e| {
        AuthError::KeyMaterialUnavailable(format!(
            "Failed to read key file {}: {}",
            path.display(),
            e
        ))
    })
}

fn pem_error(which: &'static str) -> impl Fn(jsonwebtoken::errors::Error) -> AuthError {
    move |e| AuthError::KeyMaterialUnavailable(format!("Invalid {} key PEM: {}", which, e))
}
