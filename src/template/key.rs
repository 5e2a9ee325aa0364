//! Cache key derivation

use std::fmt;

/// Separator between the template key and the cache namespace
const KEY_SEPARATOR: char = '_';

/// Key of a compiled template in the cache store.
///
/// Fully determined by the caller's template key and the configured cache
/// namespace, so every render of the same logical template hits the same slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn build(template_key: &str, namespace: &str) -> Self {
        let mut key = String::with_capacity(template_key.len() + namespace.len() + 1);
        key.push_str(template_key);
        key.push(KEY_SEPARATOR);
        key.push_str(namespace);
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
