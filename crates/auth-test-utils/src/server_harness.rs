//! Test server harness for E2E testing
//!
//! Provides TestAuthServer for spawning real authentication service
//! instances in tests, backed by an in-memory user directory.

use crate::crypto_fixtures::{test_key_material, TEST_KEY_SEED};
use crate::login_fixtures::TEST_BOT_TOKEN;
use auth_service::config::Config;
use auth_service::crypto::TokenCodec;
use auth_service::observability::metrics::init_metrics_recorder;
use auth_service::routes::{self, AppState};
use auth_service::services::user_directory::mock::MockUserDirectory;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the authentication service in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_login_flow_e2e() -> Result<()> {
///     let server = TestAuthServer::spawn(test_directory()).await?;
///
///     let response = reqwest::Client::new()
///         .post(format!("{}/auth/telegram", server.url()))
///         .json(&TestLoginBuilder::new(TEST_TELEGRAM_ID_OPERATOR).build())
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    state: Arc<AppState>,
    directory: Arc<MockUserDirectory>,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server with the default test configuration
    pub async fn spawn(directory: Arc<MockUserDirectory>) -> Result<Self, anyhow::Error> {
        Self::spawn_with_vars(directory, HashMap::new()).await
    }

    /// Spawn a server with extra environment overrides
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign with the deterministic Ed25519 key for `TEST_KEY_SEED`
    /// - Accept assertions signed with `TEST_BOT_TOKEN`
    /// - Start the HTTP server in the background
    pub async fn spawn_with_vars(
        directory: Arc<MockUserDirectory>,
        overrides: HashMap<String, String>,
    ) -> Result<Self, anyhow::Error> {
        let mut vars = HashMap::from([
            (
                "DATABASE_URL".to_string(),
                "mysql://unused/test".to_string(),
            ),
            ("TELEGRAM_BOT_TOKEN".to_string(), TEST_BOT_TOKEN.to_string()),
            // Key files are not read; key material comes from the fixture seed
            ("JWT_PRIVATE_KEY_PATH".to_string(), "unused".to_string()),
            ("JWT_PUBLIC_KEY_PATH".to_string(), "unused".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            ("DRAIN_SECONDS".to_string(), "0".to_string()),
        ]);
        vars.extend(overrides);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to build test config: {}", e))?;
        let keys = test_key_material(TEST_KEY_SEED)
            .map_err(|e| anyhow::anyhow!("Failed to load test keys: {}", e))?;

        let state = Arc::new(AppState::new(config, keys, directory.clone()));

        // The global recorder can only be installed once per process
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => PrometheusBuilder::new().build_recorder().handle(),
        };

        let app = routes::build_routes(state.clone(), metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            state,
            directory,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.state.config
    }

    /// The codec the server signs and verifies with
    pub fn codec(&self) -> &TokenCodec {
        &self.state.codec
    }

    /// The directory backing the server
    pub fn directory(&self) -> &MockUserDirectory {
        &self.directory
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
