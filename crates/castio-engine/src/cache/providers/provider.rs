//! # Cache Provider
//!
//! This module defines the cache provider trait that all cache tiers
//! implement.

use async_trait::async_trait;
use bytes::Bytes;

use crate::cache::types::{CacheKey, CacheLookupResult, CacheMetadata, CacheResult};

/// A trait for cache tiers that store and retrieve serialized payloads.
#[async_trait]
pub trait CacheProvider: Send + Sync {
    /// Get an entry from the cache.
    ///
    /// Expired entries are evicted and returned tagged
    /// [`CacheStatus::Expired`](crate::cache::CacheStatus::Expired);
    /// corrupt entries read as absent.
    async fn get(&self, key: &CacheKey) -> CacheLookupResult;

    /// Put an entry into the cache.
    async fn put(&self, key: CacheKey, data: Bytes, metadata: CacheMetadata) -> CacheResult<()>;

    /// Remove an entry from the cache.
    async fn remove(&self, key: &CacheKey) -> CacheResult<()>;

    /// Clear all entries from the cache.
    async fn clear(&self) -> CacheResult<()>;

    /// Read-only expiry check; absent or corrupt entries count as expired.
    async fn is_expired(&self, key: &CacheKey) -> CacheResult<bool>;
}
