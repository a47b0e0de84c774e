use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// In-memory cache for ranked results
///
/// Entries are stored as serialized JSON so any value type can be cached.
/// Scoring is deterministic and the catalog is immutable, so an entry only
/// goes stale when its TTL expires.
pub struct CacheManager {
    entries: moka::future::Cache<String, Vec<u8>>,
    ttl_secs: u64,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let entries = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { entries, ttl_secs }
    }

    /// Get a value from cache
    pub async fn get<T>(&self, key: &str) -> Result<T, CacheError>
    where
        T: for<'de> Deserialize<'de>,
    {
        match self.entries.get(key).await {
            Some(bytes) => {
                tracing::trace!("Cache hit: {}", key);
                Ok(serde_json::from_slice(&bytes)?)
            }
            None => {
                tracing::trace!("Cache miss: {}", key);
                Err(CacheError::CacheMiss(key.to_string()))
            }
        }
    }

    /// Set a value in cache
    pub async fn set<T>(&self, key: &str, value: &T) -> Result<(), CacheError>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.entries.insert(key.to_string(), bytes).await;

        tracing::trace!("Cache set: {} (ttl {}s)", key, self.ttl_secs);
        Ok(())
    }

    /// Drop every cached entry
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        tracing::debug!("Invalidated all cached rankings");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a ranking request
    ///
    /// Criteria and filters serialize with sorted sets, so equal requests
    /// always produce equal keys.
    pub fn ranking<T: Serialize>(request: &T, limit: usize) -> Result<String, CacheError> {
        Ok(format!("rank:{}:{}", limit, serde_json::to_string(request)?))
    }
}
