use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// `auth_date` exactly as the widget sent it.
///
/// The widget emits a number, but some clients forward the query-string form
/// as a string. Both are kept verbatim so the data-check-string matches what
/// Telegram signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthDate {
    Unix(i64),
    Text(String),
}

impl AuthDate {
    /// Value used in the data-check-string.
    pub fn as_check_value(&self) -> String {
        match self {
            AuthDate::Unix(ts) => ts.to_string(),
            AuthDate::Text(s) => s.clone(),
        }
    }

    /// Unix timestamp, if the value is a plain decimal integer.
    pub fn timestamp(&self) -> Option<i64> {
        match self {
            AuthDate::Unix(ts) => Some(*ts),
            AuthDate::Text(s) => s.parse().ok(),
        }
    }
}

/// Telegram account `id` exactly as received.
///
/// The widget emits a number; the web client forwards it as a string. The
/// received form is what gets signed, so it is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelegramId {
    Number(i64),
    Text(String),
}

impl TelegramId {
    /// Value used in the data-check-string.
    pub fn as_check_value(&self) -> String {
        match self {
            TelegramId::Number(id) => id.to_string(),
            TelegramId::Text(s) => s.clone(),
        }
    }

    /// Numeric account id, if the value is a plain decimal integer.
    pub fn value(&self) -> Option<i64> {
        match self {
            TelegramId::Number(id) => Some(*id),
            TelegramId::Text(s) => s.parse().ok(),
        }
    }
}

impl From<i64> for TelegramId {
    fn from(id: i64) -> Self {
        TelegramId::Number(id)
    }
}

/// Telegram Login Widget payload (POST /auth/telegram body).
///
/// Unknown fields are ignored and never enter the data-check-string.
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramLoginAssertion {
    pub id: TelegramId,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub auth_date: AuthDate,
    pub hash: String,
}

impl fmt::Debug for TelegramLoginAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramLoginAssertion")
            .field("id", &"[REDACTED]")
            .field("first_name", &"[REDACTED]")
            .field("last_name", &self.last_name.as_ref().map(|_| "[REDACTED]"))
            .field("username", &self.username.as_ref().map(|_| "[REDACTED]"))
            .field("photo_url", &self.photo_url.is_some())
            .field("auth_date", &self.auth_date)
            .field("hash", &self.hash)
            .finish()
    }
}

impl TelegramLoginAssertion {
    /// The string Telegram signs: every present field except `hash`, sorted
    /// by name, as `key=value` lines joined with `\n`.
    ///
    /// Absent and empty optional fields are left out.
    pub fn data_check_string(&self) -> String {
        let mut fields: BTreeMap<&'static str, String> = BTreeMap::new();
        fields.insert("id", self.id.as_check_value());
        fields.insert("first_name", self.first_name.clone());
        fields.insert("auth_date", self.auth_date.as_check_value());

        let optional = [
            ("last_name", &self.last_name),
            ("username", &self.username),
            ("photo_url", &self.photo_url),
        ];
        for (name, value) in optional {
            if let Some(v) = value.as_ref().filter(|v| !v.is_empty()) {
                fields.insert(name, v.clone());
            }
        }

        fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Employee record from the directory; the authenticated principal.
#[derive(Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Employee {
    pub user_id: i64,
    pub fullname: String,
    pub role: i32,
    pub username: Option<String>,
    pub division: Option<String>,
    pub position: Option<String>,
}

impl fmt::Debug for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Employee")
            .field("user_id", &self.user_id)
            .field("fullname", &"[REDACTED]")
            .field("role", &self.role)
            .field("username", &self.username.as_ref().map(|_| "[REDACTED]"))
            .field("division", &self.division)
            .field("position", &self.position)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, expires_in: u64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}

/// GET /auth/me response.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserInfoResponse {
    pub user_id: i64,
    pub fullname: String,
    pub role: i32,
    pub username: Option<String>,
    pub division: Option<String>,
    pub position: Option<String>,
}

impl From<Employee> for UserInfoResponse {
    fn from(employee: Employee) -> Self {
        Self {
            user_id: employee.user_id,
            fullname: employee.fullname,
            role: employee.role,
            username: employee.username,
            division: employee.division,
            position: employee.position,
        }
    }
}
