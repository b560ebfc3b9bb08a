//! HS256 bearer token validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. The token must not be on the blacklist
//! 2. The signature must verify against the shared secret
//! 3. The `exp` claim must lie in the future
//! 4. The `sub` claim must name a user
//!
//! A blacklist lookup that fails counts as revoked.

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::{SessionValidator, TokenBlacklist};

#[derive(Debug, Clone)]
pub struct JwtConfig {
    secret: Secret<String>,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    exp: Option<i64>,
}

pub struct JwtSessionValidator {
    decoding_key: DecodingKey,
    blacklist: Arc<dyn TokenBlacklist>,
}

impl JwtSessionValidator {
    pub fn new(config: JwtConfig, blacklist: Arc<dyn TokenBlacklist>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            blacklist,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked after decoding so an expired token maps to TokenExpired
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::warn!("Token validation failed: {}", e);
                AuthError::InvalidToken
            })
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        match self.blacklist.is_revoked(token).await {
            Ok(false) => {}
            Ok(true) => {
                tracing::debug!("Token is blacklisted");
                return Err(AuthError::TokenRevoked);
            }
            Err(e) => {
                tracing::error!(error = %e, "Blacklist lookup failed");
                return Err(AuthError::TokenRevoked);
            }
        }

        let claims = self.decode_claims(token)?;

        let exp = claims.exp.ok_or_else(|| {
            tracing::warn!("Token missing exp claim");
            AuthError::InvalidToken
        })?;
        let expires_at = Timestamp::from_unix_secs(exp);
        if !expires_at.is_after(&Timestamp::now()) {
            tracing::debug!("Token expired");
            return Err(AuthError::TokenExpired);
        }

        let sub = claims.sub.unwrap_or_default();
        let user_id = UserId::new(sub).map_err(|_| {
            tracing::warn!("Token carries no subject");
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, expires_at))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator").finish_non_exhaustive()
    }
}
