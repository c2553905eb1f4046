pub mod login_verifier;
pub mod token_service;
pub mod user_directory;
