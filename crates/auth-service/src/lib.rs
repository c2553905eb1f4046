//! STP Authentication Service Library
//!
//! Verifies Telegram Login Widget assertions, issues signed access tokens to
//! known employees and authenticates bearer tokens on protected routes.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Key material and the JWT codec
//! - `errors` - Error types and the HTTP boundary translator
//! - `handlers` - HTTP request handlers
//! - `middleware` - Bearer-token authentication
//! - `models` - Request, response and directory models
//! - `observability` - Metrics and log-correlation helpers
//! - `repositories` - Database access layer
//! - `routes` - Router construction and shared state
//! - `services` - Login verification, user directory and token issuance

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
