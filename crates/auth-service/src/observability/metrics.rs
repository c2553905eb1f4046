//! Metrics definitions for the authentication service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `status`: 2 values (success, error)
//! - `reason`: bounded by `AuthError::reason`
//! - `error_category`: 4 values (authentication, authorization, cryptographic, internal)

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        // Login includes one directory round trip
        .set_buckets_for_metric(
            Matcher::Prefix("auth_login".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500,
            ],
        )
        .map_err(|e| format!("Failed to set login buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Login Metrics
// ============================================================================

/// Record a login attempt outcome
///
/// Metric: `auth_login_attempts_total`
/// Labels: `status`, `reason`
pub fn record_login_attempt(status: &str, reason: &str) {
    counter!("auth_login_attempts_total", "status" => status.to_string(), "reason" => reason.to_string())
        .increment(1);
}

/// Record end-to-end login duration
///
/// Metric: `auth_login_duration_seconds`
/// Labels: `status`
pub fn record_login_duration(status: &str, duration: Duration) {
    histogram!("auth_login_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());
}

// ============================================================================
// Token Metrics
// ============================================================================

/// Record access token issuance
///
/// Metric: `auth_token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &str) {
    counter!("auth_token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record bearer token validation result
///
/// Metric: `auth_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("auth_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}
