//! Key-value store backing the compiled-template cache.
//!
//! The render pipeline only needs get and set-with-expiry. `MemoryCacheStore`
//! is the in-process implementation; entries expire lazily on read and are
//! swept by [`crate::tasks::CacheCleanupTask`].

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use thiserror::Error;

use super::types::CompiledTemplate;

/// Errors that can occur during cache store operations.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    /// Store is temporarily unavailable
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    /// TTL cannot be represented by the store
    #[error("Invalid TTL: {0}")]
    InvalidTtl(String),
}

/// Store of compiled templates with per-entry expiry.
///
/// Implementations impose no locking discipline across calls: two
/// concurrent misses may both `set`, and the last write wins.
pub trait CacheStore: Send + Sync {
    /// Look up an unexpired entry
    fn try_get(&self, key: &str) -> Result<Option<CompiledTemplate>, CacheStoreError>;

    /// Insert or overwrite an entry that expires after `ttl`
    fn set(&self, key: &str, value: CompiledTemplate, ttl: Duration)
        -> Result<(), CacheStoreError>;
}

/// A compiled template held by the memory store
#[derive(Debug, Clone)]
struct CacheEntry {
    template: CompiledTemplate,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache store using DashMap.
///
/// Entries are lost on restart and never shared across processes.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before.saturating_sub(self.entries.len());

        if purged > 0 {
            tracing::debug!(purged = purged, "Purged expired compiled templates");
        }

        purged
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CacheStore for MemoryCacheStore {
    fn try_get(&self, key: &str) -> Result<Option<CompiledTemplate>, CacheStoreError> {
        let now = Utc::now();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.template.clone())),
            Some(_) => {}
            None => return Ok(None),
        }

        // Expired: drop it unless a concurrent set already replaced it
        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        Ok(None)
    }

    fn set(
        &self,
        key: &str,
        value: CompiledTemplate,
        ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| CacheStoreError::InvalidTtl(e.to_string()))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| CacheStoreError::InvalidTtl("expiry overflows".to_string()))?;

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                template: value,
                expires_at,
            },
        );

        Ok(())
    }
}

/// Create an Arc-wrapped memory cache store
pub fn create_cache_store() -> Arc<MemoryCacheStore> {
    Arc::new(MemoryCacheStore::new())
}
