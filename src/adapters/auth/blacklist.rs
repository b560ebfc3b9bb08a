//! In-memory token blacklist.
//!
//! Revoked tokens are kept as SHA-256 digests together with their expiry so
//! the purge job can drop entries that could no longer be presented anyway.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::ports::TokenBlacklist;

/// Lowercase hex SHA-256 of a raw token.
pub fn token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenBlacklist {
    entries: Arc<RwLock<HashMap<String, Timestamp>>>,
}

impl InMemoryTokenBlacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl TokenBlacklist for InMemoryTokenBlacklist {
    async fn is_revoked(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.entries.read().await.contains_key(&token_digest(token)))
    }

    async fn revoke(&self, token: &str, expires_at: Timestamp) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .insert(token_digest(token), expires_at);
        Ok(())
    }

    async fn purge_expired(&self, now: Timestamp) -> Result<usize, DomainError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| !expires_at.is_before(&now));
        Ok(before - entries.len())
    }
}
