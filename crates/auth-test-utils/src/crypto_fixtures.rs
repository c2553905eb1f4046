//! Deterministic cryptographic fixtures for testing
//!
//! Provides reproducible Ed25519 keypairs in the encodings the service loads
//! (PKCS#8 DER, PKCS#8 PEM, SPKI PEM). All fixtures are deterministic based
//! on seed values.

use auth_service::crypto::keys::KeyMaterial;
use base64::engine::general_purpose;
use base64::Engine;
use ring::signature::{Ed25519KeyPair, KeyPair};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Seed used by `TestAuthServer` for its signing key.
pub const TEST_KEY_SEED: u8 = 1;

/// A 32+ byte secret for HS256 tests.
pub const TEST_HS256_SECRET: &str = "test-hs256-secret-do-not-use-in-production";

/// Test fixture error type
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    #[error("Fixture I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A deterministic Ed25519 key in every encoding tests need.
#[derive(Debug, Clone)]
pub struct TestSigningKey {
    pub pkcs8_der: Vec<u8>,
    pub public_key: Vec<u8>,
    pub private_pem: String,
    pub public_pem: String,
}

/// Generate a deterministic Ed25519 signing key for testing.
///
/// The same seed always produces the same keypair, ensuring test reproducibility.
///
/// # Example
/// ```rust,ignore
/// let key = test_signing_key(1)?;
/// assert_eq!(key.public_pem, test_signing_key(1)?.public_pem);
/// ```
pub fn test_signing_key(seed: u8) -> Result<TestSigningKey, FixtureError> {
    let seed_bytes = seed_bytes(seed);

    // Deterministic and suitable for testing only
    let key_pair = Ed25519KeyPair::from_seed_unchecked(&seed_bytes)
        .map_err(|e| FixtureError::Crypto(format!("Failed to generate test keypair: {:?}", e)))?;
    let public_key = key_pair.public_key().as_ref().to_vec();

    let pkcs8_der = build_pkcs8_from_seed(&seed_bytes);
    let private_pem = to_pem("PRIVATE KEY", &pkcs8_der);
    let public_pem = to_pem("PUBLIC KEY", &build_spki(&public_key));

    Ok(TestSigningKey {
        pkcs8_der,
        public_key,
        private_pem,
        public_pem,
    })
}

/// Service key material for a deterministic seed.
pub fn test_key_material(seed: u8) -> Result<KeyMaterial, FixtureError> {
    let key = test_signing_key(seed)?;
    KeyMaterial::from_ed25519_pkcs8(&key.pkcs8_der)
        .map_err(|e| FixtureError::Crypto(format!("Failed to load test key material: {}", e)))
}

/// Write the PEM pair for `seed` into `dir`.
///
/// Returns `(private_key_path, public_key_path)`.
pub fn write_test_key_files(seed: u8, dir: &Path) -> Result<(PathBuf, PathBuf), FixtureError> {
    let key = test_signing_key(seed)?;
    let private_path = dir.join(format!("jwt_private_{seed}.pem"));
    let public_path = dir.join(format!("jwt_public_{seed}.pem"));
    std::fs::write(&private_path, key.private_pem)?;
    std::fs::write(&public_path, key.public_pem)?;
    Ok((private_path, public_path))
}

fn seed_bytes(seed: u8) -> [u8; 32] {
    let mut seed_bytes = [0u8; 32];
    seed_bytes[0] = seed;
    // Fill rest with deterministic pattern
    for (i, byte) in seed_bytes.iter_mut().enumerate().skip(1) {
        *byte = seed.wrapping_mul(i as u8).wrapping_add(i as u8);
    }
    seed_bytes
}

fn to_pem(tag: &str, der: &[u8]) -> String {
    format!(
        "-----BEGIN {tag}-----\n{}\n-----END {tag}-----\n",
        general_purpose::STANDARD.encode(der)
    )
}

/// Build PKCS#8 v1 document from Ed25519 seed
///
/// This is a test-only utility. Production keys come from real key files.
fn build_pkcs8_from_seed(seed: &[u8; 32]) -> Vec<u8> {
    // PKCS#8 v1 format for Ed25519 (RFC 8410):
    // SEQUENCE {
    //   version         INTEGER (0),
    //   algorithm       AlgorithmIdentifier { 1.3.101.112 },
    //   privateKey      OCTET STRING { OCTET STRING <seed> }
    // }
    let mut pkcs8 = Vec::with_capacity(48);
    pkcs8.extend_from_slice(&[0x30, 0x2e]);
    pkcs8.extend_from_slice(&[0x02, 0x01, 0x00]);
    pkcs8.extend_from_slice(&[0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70]);
    pkcs8.extend_from_slice(&[0x04, 0x22, 0x04, 0x20]);
    pkcs8.extend_from_slice(seed);
    pkcs8
}

/// SubjectPublicKeyInfo for a raw Ed25519 public key (RFC 8410).
fn build_spki(public_key: &[u8]) -> Vec<u8> {
    let mut spki = Vec::with_capacity(44);
    spki.extend_from_slice(&[0x30, 0x2a]);
    spki.extend_from_slice(&[0x30, 0x05, 0x06, 0x03, 0x2b, 0x65, 0x70]);
    spki.extend_from_slice(&[0x03, 0x21, 0x00]);
    spki.extend_from_slice(public_key);
    spki
}
