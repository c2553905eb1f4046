//! Common utilities shared across the STP authentication crates.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for JWT utilities (size limits, header inspection, iat validation)
pub mod jwt;
