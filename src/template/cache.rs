//! Compiled-template cache on top of a [`CacheStore`]

use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;
use crate::metrics::CacheMetrics;

use super::key::CacheKey;
use super::store::CacheStore;
use super::types::CompiledTemplate;

/// Looks up and stores compiled templates.
///
/// Store failures never reach the caller: a failed read is a miss and a
/// failed write is dropped after logging.
#[derive(Clone)]
pub struct CompiledTemplateCache {
    store: Arc<dyn CacheStore>,
    namespace: String,
    ttl: Duration,
    enabled: bool,
}

impl CompiledTemplateCache {
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self {
            store,
            namespace: config.name.clone(),
            ttl: config.lifetime(),
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// TTL applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Derive the cache key for a template key in this cache's namespace
    pub fn key_for(&self, template_key: &str) -> CacheKey {
        CacheKey::build(template_key, &self.namespace)
    }

    pub fn try_get(&self, key: &CacheKey) -> Option<CompiledTemplate> {
        match self.store.try_get(key.as_str()) {
            Ok(Some(compiled)) => {
                CacheMetrics::record_hit();
                Some(compiled)
            }
            Ok(None) => {
                CacheMetrics::record_miss();
                None
            }
            Err(e) => {
                CacheMetrics::record_read_error();
                CacheMetrics::record_miss();
                tracing::warn!(
                    cache_key = %key,
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                None
            }
        }
    }

    pub fn set(&self, key: &CacheKey, compiled: CompiledTemplate) {
        match self.store.set(key.as_str(), compiled, self.ttl) {
            Ok(()) => {
                CacheMetrics::record_set();
                tracing::debug!(
                    cache_key = %key,
                    ttl_secs = self.ttl.as_secs(),
                    "Compiled template cached"
                );
            }
            Err(e) => {
                CacheMetrics::record_write_error();
                tracing::warn!(
                    cache_key = %key,
                    error = %e,
                    "Cache write failed, continuing without caching"
                );
            }
        }
    }
}

impl std::fmt::Debug for CompiledTemplateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplateCache")
            .field("namespace", &self.namespace)
            .field("ttl", &self.ttl)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}
