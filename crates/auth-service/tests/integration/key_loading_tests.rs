//! Startup key loading from configured PEM files

use auth_service::config::Config;
use auth_service::crypto::keys::{KeyMaterial, SigningAlgorithm};
use auth_service::crypto::TokenCodec;
use auth_service::errors::AuthError;
use auth_test_utils::{test_employee, write_test_key_files, ROLE_OPERATOR, TEST_BOT_TOKEN};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

fn config_with_keys(private_path: &Path, public_path: &Path) -> Config {
    let vars = HashMap::from([
        ("DATABASE_URL".to_string(), "mysql://unused/test".to_string()),
        ("TELEGRAM_BOT_TOKEN".to_string(), TEST_BOT_TOKEN.to_string()),
        (
            "JWT_PRIVATE_KEY_PATH".to_string(),
            private_path.display().to_string(),
        ),
        (
            "JWT_PUBLIC_KEY_PATH".to_string(),
            public_path.display().to_string(),
        ),
    ]);
    Config::from_vars(&vars).unwrap()
}

#[test]
fn test_load_configured_key_files() {
    let dir = tempfile::tempdir().unwrap();
    let (private_path, public_path) = write_test_key_files(9, dir.path()).unwrap();

    let keys = KeyMaterial::load(&config_with_keys(&private_path, &public_path)).unwrap();
    assert_eq!(keys.algorithm(), SigningAlgorithm::EdDSA);

    let codec = TokenCodec::new(keys, Duration::from_secs(60), Duration::from_secs(300));
    let token = codec.issue(&test_employee(111, ROLE_OPERATOR)).unwrap();
    assert_eq!(codec.decode(&token).unwrap().user_id, Some(111));
}

#[test]
fn test_missing_key_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let (private_path, _) = write_test_key_files(9, dir.path()).unwrap();
    let missing = dir.path().join("absent.pem");

    let result = KeyMaterial::load(&config_with_keys(&private_path, &missing));
    assert!(matches!(result, Err(AuthError::KeyMaterialUnavailable(_))));
}

#[test]
fn test_mismatched_key_pair_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let (private_path, _) = write_test_key_files(9, dir.path()).unwrap();
    let (_, other_public) = write_test_key_files(10, dir.path()).unwrap();

    let result = KeyMaterial::load(&config_with_keys(&private_path, &other_public));
    assert!(matches!(result, Err(AuthError::KeyMaterialUnavailable(_))));
}
