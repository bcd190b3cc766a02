//! # Cache Manager
//!
//! Coordinates the memory and disk tiers behind a single get/set API and
//! implements the get-or-fetch-and-populate pattern consumers use.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io;
use tracing::{debug, warn};

use crate::cache::providers::disk::DiskCache;
use crate::cache::providers::memory::MemoryCache;
use crate::cache::providers::provider::CacheProvider;
use crate::cache::types::{CacheConfig, CacheKey, CacheMetadata, CacheStatus};

/// Cache manager handling both memory and disk tiers.
///
/// Constructed once at application start and shared by cloning; there is
/// no implicit global instance.
#[derive(Clone)]
pub struct CacheManager {
    memory_cache: Arc<MemoryCache>,
    disk_cache: Arc<DiskCache>,
    config: Arc<CacheConfig>,
}

impl CacheManager {
    /// Create a new cache manager with the specified configuration.
    pub async fn new(mut config: CacheConfig) -> io::Result<Self> {
        // If no cache path provided, use system temp
        if config.cache_dir.is_none() {
            config.cache_dir = Some(std::env::temp_dir().join("castio-cache"));
        }

        let cache_dir = config.cache_dir.as_ref().unwrap().clone();
        let config = Arc::new(config);

        let memory_cache = Arc::new(MemoryCache::new(config.max_memory_cache_size));
        let disk_cache = Arc::new(DiskCache::new(cache_dir, config.enabled));

        // Initialize the cache directories in advance
        if config.enabled {
            disk_cache.ensure_initialized().await?;
        }

        Ok(Self {
            memory_cache,
            disk_cache,
            config,
        })
    }

    /// Raw tier lookup: memory first, then disk with memory backfill.
    /// An expired entry at either tier reads as a miss.
    async fn lookup(&self, key: &CacheKey) -> Option<(Bytes, CacheMetadata)> {
        if !self.config.enabled {
            return None;
        }

        match self.memory_cache.get(key).await {
            Ok(Some((data, metadata, CacheStatus::Hit))) => return Some((data, metadata)),
            Ok(Some(_)) => {
                // The memory tier mirrors the durable record, so a stale
                // read here means the durable copy is just as stale.
                let _ = self.disk_cache.remove(key).await;
                return None;
            }
            Ok(None) => {}
            Err(e) => warn!(key = ?key, error = %e, "memory cache read failed"),
        }

        match self.disk_cache.get(key).await {
            Ok(Some((data, metadata, CacheStatus::Hit))) => {
                // Backfill the memory tier for faster access next time
                let _ = self
                    .memory_cache
                    .put(key.clone(), data.clone(), metadata.clone())
                    .await;

                Some((data, metadata))
            }
            // Expired records were already evicted by the provider
            Ok(Some(_)) | Ok(None) => None,
            Err(e) => {
                warn!(key = ?key, error = %e, "disk cache read failed");
                None
            }
        }
    }

    /// Get a cached value. Expired or corrupt entries read as `None`;
    /// storage failures never surface.
    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let (data, _) = self.lookup(key).await?;

        match serde_json::from_slice(&data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = ?key, error = %e, "cached payload failed to decode, evicting");
                self.remove(key).await;
                None
            }
        }
    }

    /// Write a value through both tiers with the given time-to-live.
    /// Best-effort: storage failures are logged, never surfaced.
    pub async fn set<T: Serialize>(&self, key: &CacheKey, value: &T, ttl: Duration) {
        if !self.config.enabled {
            return;
        }

        let data = match serde_json::to_vec(value) {
            Ok(data) => Bytes::from(data),
            Err(e) => {
                warn!(key = ?key, error = %e, "failed to serialize cache payload");
                return;
            }
        };
        let metadata = CacheMetadata::new(ttl);

        let _ = self
            .memory_cache
            .put(key.clone(), data.clone(), metadata.clone())
            .await;

        if let Err(e) = self.disk_cache.put(key.clone(), data, metadata).await {
            warn!(key = ?key, error = %e, "durable cache write failed");
        }
    }

    /// Remove a key from both tiers.
    pub async fn remove(&self, key: &CacheKey) {
        if !self.config.enabled {
            return;
        }

        if let Err(e) = self.memory_cache.remove(key).await {
            warn!(key = ?key, error = %e, "memory cache remove failed");
        }
        if let Err(e) = self.disk_cache.remove(key).await {
            warn!(key = ?key, error = %e, "disk cache remove failed");
        }
    }

    /// Clear all entries from both tiers.
    pub async fn clear(&self) {
        if !self.config.enabled {
            return;
        }

        if let Err(e) = self.memory_cache.clear().await {
            warn!(error = %e, "memory cache clear failed");
        }
        if let Err(e) = self.disk_cache.clear().await {
            warn!(error = %e, "disk cache clear failed");
        }
    }

    /// Read-only expiry check against the durable tier; absent or corrupt
    /// records count as expired.
    pub async fn is_expired(&self, key: &CacheKey) -> bool {
        if !self.config.enabled {
            return true;
        }

        match self.disk_cache.is_expired(key).await {
            Ok(expired) => expired,
            Err(e) => {
                warn!(key = ?key, error = %e, "expiry check failed");
                true
            }
        }
    }

    /// Get a cached value, or fetch, cache and return it.
    ///
    /// A fresh entry resolves without invoking `fetcher`. On a miss,
    /// `fetcher` runs exactly once; its error propagates unchanged and
    /// nothing is cached. Concurrent callers on a cold key are not
    /// coalesced: each invokes its own fetch.
    pub async fn get_or_fetch<T, E, F, Fut>(
        &self,
        key: &CacheKey,
        ttl: Duration,
        fetcher: F,
    ) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.get::<T>(key).await {
            debug!(key = ?key, "cache hit");
            return Ok(value);
        }

        debug!(key = ?key, "cache miss, fetching");
        let value = fetcher().await?;
        self.set(key, &value, ttl).await;
        Ok(value)
    }

    /// Get configuration reference.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}
