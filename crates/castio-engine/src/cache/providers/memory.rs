//! # Memory Cache Provider
//!
//! Process-lifetime cache tier backed by Moka, layered in front of the
//! durable tier for zero-latency repeat reads.

use bytes::Bytes;
use moka::sync::Cache as MokaCache;
use tracing::{debug, warn};

use crate::cache::providers::provider::CacheProvider;
use crate::cache::types::{CacheKey, CacheLookupResult, CacheMetadata, CacheResult, CacheStatus};

/// Entry in the memory cache.
#[derive(Clone)]
struct MemoryEntry {
    /// Serialized payload bytes.
    data: Bytes,
    /// Freshness metadata mirrored from the durable record.
    metadata: CacheMetadata,
}

/// Memory cache provider implementation using Moka.
#[derive(Clone)]
pub struct MemoryCache {
    cache: MokaCache<CacheKey, MemoryEntry>,
    /// Maximum size for this cache in bytes.
    max_size: u64,
}

impl MemoryCache {
    /// Create a new memory cache with the specified size limit.
    pub fn new(max_size_bytes: u64) -> Self {
        if max_size_bytes == 0 {
            panic!("Memory cache size must be greater than zero");
        }

        // Size based eviction
        let cache = MokaCache::builder()
            .weigher(|_k, v: &MemoryEntry| v.data.len().try_into().unwrap_or(u32::MAX))
            .max_capacity(max_size_bytes)
            .build();

        Self {
            cache,
            max_size: max_size_bytes,
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for MemoryCache {
    async fn get(&self, key: &CacheKey) -> CacheLookupResult {
        let Some(entry) = self.cache.get(key) else {
            return Ok(None);
        };

        // The tier holds no TTL of its own; expiry follows the metadata
        // recorded when the entry was written.
        if entry.metadata.is_expired() {
            debug!(key = ?key, "memory cache entry expired");
            self.cache.invalidate(key);
            return Ok(Some((entry.data, entry.metadata, CacheStatus::Expired)));
        }

        Ok(Some((entry.data, entry.metadata, CacheStatus::Hit)))
    }

    async fn put(&self, key: CacheKey, data: Bytes, metadata: CacheMetadata) -> CacheResult<()> {
        // A single entry larger than the whole tier cannot be admitted.
        if data.len() as u64 > self.max_size {
            warn!(
                key = ?key,
                size = data.len(),
                max_size = self.max_size,
                "entry too large for memory cache, skipping"
            );
            return Ok(());
        }

        self.cache.insert(key, MemoryEntry { data, metadata });
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        self.cache.invalidate(key);
        Ok(())
    }

    async fn clear(&self) -> CacheResult<()> {
        self.cache.invalidate_all();
        debug!("memory cache cleared");
        Ok(())
    }

    async fn is_expired(&self, key: &CacheKey) -> CacheResult<bool> {
        Ok(self
            .cache
            .get(key)
            .map(|entry| entry.metadata.is_expired())
            .unwrap_or(true))
    }
}
