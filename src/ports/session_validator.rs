//! Session validation port for bearer credentials.
//!
//! Live connections and HTTP requests both present a credential string; this
//! port turns it into a user identity or explains why it was refused.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates bearer credentials and extracts the user identity.
///
/// # Contract
///
/// Implementations must refuse, in this order:
/// - credentials on the invalidation blacklist (`AuthError::TokenRevoked`)
/// - credentials that cannot be decoded or verified (`AuthError::InvalidToken`)
/// - credentials whose expiry has passed (`AuthError::TokenExpired`)
/// - credentials without a usable subject (`AuthError::InvalidToken`)
#[async_trait]
pub trait SessionValidator: Send + Sync {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
