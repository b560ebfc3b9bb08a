//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Shortest accepted HS256 secret.
const MIN_SECRET_LEN: usize = 32;

/// Authentication configuration (HS256 bearer tokens)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret the tokens are signed with
    pub jwt_secret: Secret<String>,

    /// Cookie carrying the token on the WebSocket handshake and API calls
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: Secret::new(jwt_secret.into()),
            cookie_name: default_cookie_name(),
        }
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(ValidationError::JwtSecretTooShort(MIN_SECRET_LEN));
        }
        if self.cookie_name.is_empty()
            || self
                .cookie_name
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, ';' | '=' | ','))
        {
            return Err(ValidationError::InvalidCookieName);
        }
        Ok(())
    }
}

fn default_cookie_name() -> String {
    "jwt".to_string()
}
