//! Authentication types for the domain layer.
//!
//! These types represent a user identified by a bearer credential. They have
//! **no external dependencies**: any token scheme can populate them via the
//! `SessionValidator` port.

use super::{Timestamp, UserId};
use thiserror::Error;

/// User identified by a validated bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject of the credential.
    pub id: UserId,

    /// When the credential stops being valid.
    pub expires_at: Timestamp,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, expires_at: Timestamp) -> Self {
        Self { id, expires_at }
    }
}

/// Authentication errors that can occur during credential validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is malformed, has an invalid signature or carries no subject.
    #[error("Invalid token")]
    InvalidToken,

    /// The token's expiry lies in the past.
    #[error("Token expired")]
    TokenExpired,

    /// The token was explicitly invalidated (logout, password change).
    #[error("Token revoked")]
    TokenRevoked,

    /// The validation backend is unavailable.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Text shown to a live client whose credential was refused.
    ///
    /// Revoked and expired credentials were well-formed but are no longer
    /// accepted; everything else means the credential could not be checked.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthError::TokenExpired | AuthError::TokenRevoked => "Invalid credentials",
            AuthError::InvalidToken | AuthError::ServiceUnavailable(_) => "Authentication failed",
        }
    }
}
