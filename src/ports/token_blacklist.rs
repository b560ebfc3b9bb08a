//! TokenBlacklist port - credentials invalidated before their expiry.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Timestamp};

/// Store of revoked credentials.
///
/// This service only reads the store. Entries are written through `revoke`
/// by whatever issues and logs out credentials, typically sharing the
/// Postgres `token_blacklist` table.
///
/// Entries only need to outlive the credential itself; `purge_expired`
/// drops the ones that would be refused for expiry anyway.
#[async_trait]
pub trait TokenBlacklist: Send + Sync {
    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError>;

    async fn revoke(&self, token: &str, expires_at: Timestamp) -> Result<(), DomainError>;

    /// Removes entries whose credential expired before `now`. Returns how many.
    async fn purge_expired(&self, now: Timestamp) -> Result<usize, DomainError>;
}
