//! HTTP routes for the authentication service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::crypto::keys::KeyMaterial;
use crate::crypto::TokenCodec;
use crate::handlers;
use crate::middleware::auth::{require_auth, AuthState};
use crate::services::login_verifier::LoginAssertionVerifier;
use crate::services::user_directory::UserDirectory;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Application state shared across all handlers.
///
/// Everything here is immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub verifier: Arc<LoginAssertionVerifier>,
    pub codec: Arc<TokenCodec>,
    pub directory: Arc<dyn UserDirectory>,
}

impl AppState {
    /// Assemble state from configuration, loaded keys and a directory.
    pub fn new(config: Config, keys: KeyMaterial, directory: Arc<dyn UserDirectory>) -> Self {
        let verifier = LoginAssertionVerifier::new(
            config.bot_token(),
            Duration::from_secs(config.telegram_auth_max_age_seconds),
        );
        let codec = TokenCodec::new(
            keys,
            Duration::from_secs(config.jwt_access_token_ttl_seconds),
            Duration::from_secs(config.jwt_clock_skew_seconds),
        );

        Self {
            config,
            verifier: Arc::new(verifier),
            codec: Arc::new(codec),
            directory,
        }
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe - public
/// - `/metrics` - Prometheus metrics endpoint - public
/// - `/auth/telegram` - Telegram login, issues access tokens - public
/// - `/auth/me` - Current employee - requires authentication
/// - TraceLayer for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_state = AuthState {
        codec: state.codec.clone(),
        directory: state.directory.clone(),
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/auth/telegram", post(handlers::handle_telegram_login))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Protected routes (authentication required)
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::handle_me))
        .route_layer(middleware::from_fn_with_state(auth_state, require_auth))
        .with_state(state);

    public_routes
        .merge(metrics_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
}
