//! Telegram Login Widget fixtures
//!
//! Builds login assertions signed exactly the way Telegram signs them, so
//! tests exercise the real verifier instead of a stub.

use auth_service::models::{AuthDate, TelegramId, TelegramLoginAssertion};
use chrono::Utc;
use ring::{digest, hmac};

/// Bot token `TestAuthServer` is configured with.
pub const TEST_BOT_TOKEN: &str = "123456:TEST-BOT-TOKEN";

/// Compute the widget `hash` for an assertion under `bot_token`.
pub fn sign_login_assertion(bot_token: &str, assertion: &TelegramLoginAssertion) -> String {
    let secret = digest::digest(&digest::SHA256, bot_token.as_bytes());
    let key = hmac::Key::new(hmac::HMAC_SHA256, secret.as_ref());
    let tag = hmac::sign(&key, assertion.data_check_string().as_bytes());
    hex::encode(tag.as_ref())
}

/// Builder for signed login assertions
///
/// # Example
/// ```rust,ignore
/// let assertion = TestLoginBuilder::new(111)
///     .with_username("ivanp")
///     .issued_seconds_ago(90_000)
///     .build();
/// ```
pub struct TestLoginBuilder {
    id: TelegramId,
    first_name: String,
    last_name: Option<String>,
    username: Option<String>,
    photo_url: Option<String>,
    auth_date: AuthDate,
    bot_token: String,
}

impl TestLoginBuilder {
    /// Create a builder for Telegram account `id`, authenticated now
    pub fn new(id: i64) -> Self {
        Self {
            id: TelegramId::Number(id),
            first_name: "Test".to_string(),
            last_name: None,
            username: None,
            photo_url: None,
            auth_date: AuthDate::Unix(Utc::now().timestamp()),
            bot_token: TEST_BOT_TOKEN.to_string(),
        }
    }

    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self
    }

    pub fn with_last_name(mut self, last_name: &str) -> Self {
        self.last_name = Some(last_name.to_string());
        self
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_photo_url(mut self, photo_url: &str) -> Self {
        self.photo_url = Some(photo_url.to_string());
        self
    }

    /// Send `id` as a raw string value (signed verbatim)
    pub fn id_text(mut self, value: &str) -> Self {
        self.id = TelegramId::Text(value.to_string());
        self
    }

    /// Shape the payload like the web client: string `id` and `auth_date`,
    /// empty strings for unset optional fields
    pub fn as_web_client(mut self) -> Self {
        self.id = TelegramId::Text(self.id.as_check_value());
        self.auth_date = AuthDate::Text(self.auth_date.as_check_value());
        self.last_name.get_or_insert_with(String::new);
        self.username.get_or_insert_with(String::new);
        self.photo_url.get_or_insert_with(String::new);
        self
    }

    /// Set `auth_date` to an absolute timestamp
    pub fn auth_date(mut self, timestamp: i64) -> Self {
        self.auth_date = AuthDate::Unix(timestamp);
        self
    }

    /// Set `auth_date` to a raw string value (signed verbatim)
    pub fn auth_date_text(mut self, value: &str) -> Self {
        self.auth_date = AuthDate::Text(value.to_string());
        self
    }

    /// Set `auth_date` relative to now
    pub fn issued_seconds_ago(mut self, seconds: i64) -> Self {
        self.auth_date = AuthDate::Unix(Utc::now().timestamp() - seconds);
        self
    }

    /// Sign with a different bot token
    pub fn signed_by(mut self, bot_token: &str) -> Self {
        self.bot_token = bot_token.to_string();
        self
    }

    /// Build the assertion with a valid `hash`
    pub fn build(self) -> TelegramLoginAssertion {
        let mut assertion = TelegramLoginAssertion {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            photo_url: self.photo_url,
            auth_date: self.auth_date,
            hash: String::new(),
        };
        assertion.hash = sign_login_assertion(&self.bot_token, &assertion);
        assertion
    }
}
