//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports the [`secrecy`] types used for every credential the auth
//! service handles: the Telegram bot token, the HS256 signing secret and
//! database URLs carrying passwords.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so a
//! struct deriving `Debug` around them is safe to log. Values are zeroized on
//! drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct BotSettings {
//!     bot_name: String,
//!     bot_token: SecretString,
//! }
//!
//! let settings = BotSettings {
//!     bot_name: "stp_login_bot".to_string(),
//!     bot_token: SecretString::from("123456:ABC"),
//! };
//!
//! // bot_token prints as [REDACTED]
//! println!("{:?}", settings);
//!
//! let token: &str = settings.bot_token.expose_secret();
//! assert_eq!(token, "123456:ABC");
//! ```
//!
//! # Usage Guidelines
//!
//! Use `SecretString` for:
//! - Telegram bot tokens
//! - Symmetric JWT signing secrets
//! - Connection strings with embedded credentials
//!
//! Never wrap issued bearer tokens for the client in these types once they
//! leave the service; they are opaque to us by then.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
