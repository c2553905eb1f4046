//! # Auth Test Utilities
//!
//! Shared test utilities for the authentication service.
//!
//! This crate provides:
//! - Deterministic crypto fixtures (fixed Ed25519 keys for reproducible tests)
//! - Telegram login assertion builders that sign like the Login Widget
//! - Claims builders for hand-crafted tokens
//! - Server test harness (TestAuthServer backed by an in-memory directory)
//! - Fixed test IDs and employees
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestAuthServer::spawn(test_directory()).await?;
//!
//!     let assertion = TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR).build();
//!     let response = reqwest::Client::new()
//!         .post(format!("{}/auth/telegram", server.url()))
//!         .json(&assertion)
//!         .send()
//!         .await?;
//!
//!     let body: serde_json::Value = response.json().await?;
//!     body["access_token"]
//!         .as_str()
//!         .unwrap()
//!         .to_string()
//!         .assert_valid_jwt()
//!         .assert_for_subject("111");
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod login_fixtures;
pub mod server_harness;
pub mod test_ids;
pub mod token_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use login_fixtures::*;
pub use server_harness::*;
pub use test_ids::*;
pub use token_builders::*;
