//! # Cache Types
//!
//! Common types used across the caching system.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Status of a cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Resource found in cache and still valid.
    Hit,
    /// Resource not found in cache.
    Miss,
    /// Resource found but past its time-to-live.
    Expired,
}

/// Types of resources that can be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheResourceType {
    /// Top-podcasts listing.
    TopPodcasts,
    /// Podcast detail and episode lookup.
    PodcastLookup,
}

/// Cache key identifying one logical resource.
///
/// Keys are stable for identical logical requests across restarts, so a
/// key always resolves the same durable record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Type of resource.
    pub resource_type: CacheResourceType,
    /// Identifier within the resource type (e.g. a podcast id).
    pub identifier: Option<String>,
}

impl CacheKey {
    /// Create a new cache key.
    pub fn new(resource_type: CacheResourceType, identifier: Option<String>) -> Self {
        Self {
            resource_type,
            identifier,
        }
    }

    /// Key for the top-podcasts listing.
    pub fn top_podcasts() -> Self {
        Self::new(CacheResourceType::TopPodcasts, None)
    }

    /// Key for a podcast's lookup record.
    pub fn podcast_lookup(id: impl Into<String>) -> Self {
        Self::new(CacheResourceType::PodcastLookup, Some(id.into()))
    }

    /// Convert to a filename-safe string.
    pub fn to_filename(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(format!("{:?}", self.resource_type));
        if let Some(id) = &self.identifier {
            hasher.update(":");
            hasher.update(id);
        }

        let hash = hasher.finalize();
        format!("{hash:x}")
    }
}

/// Milliseconds since the Unix epoch.
pub(crate) fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Freshness metadata stored alongside a cached payload.
///
/// `ttl` is expected to be positive; a zero TTL expires on the next read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// When the payload was cached, epoch milliseconds.
    pub timestamp: u64,
    /// Time-to-live in milliseconds.
    pub ttl: u64,
}

impl CacheMetadata {
    /// Create metadata stamped with the current time.
    pub fn new(ttl: Duration) -> Self {
        Self {
            timestamp: epoch_millis(),
            ttl: ttl.as_millis() as u64,
        }
    }

    /// Expiry check against the current clock.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(epoch_millis())
    }

    /// An entry is expired once its age strictly exceeds its ttl.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) > self.ttl
    }
}

/// Configuration for the cache system.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Directory for durable storage; the system temp dir when `None`.
    pub cache_dir: Option<PathBuf>,
    /// Maximum size of the in-memory tier in bytes.
    pub max_memory_cache_size: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: None, // If None, we'll use system temp dir
            max_memory_cache_size: 8 * 1024 * 1024, // 8MB
        }
    }
}

/// Result of a cache operation.
pub type CacheResult<T> = std::result::Result<T, std::io::Error>;

/// Result of a cache lookup operation.
pub type CacheLookupResult =
    CacheResult<Option<(bytes::Bytes, CacheMetadata, CacheStatus)>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expiry_boundary_is_strict() {
        let metadata = CacheMetadata {
            timestamp: 1_000,
            ttl: 500,
        };

        assert!(!metadata.is_expired_at(1_499));
        assert!(!metadata.is_expired_at(1_500));
        assert!(metadata.is_expired_at(1_501));
    }

    #[test]
    fn clock_skew_reads_as_fresh() {
        let metadata = CacheMetadata {
            timestamp: 2_000,
            ttl: 500,
        };

        // A timestamp from the future saturates to zero age.
        assert!(!metadata.is_expired_at(1_000));
    }

    #[test]
    fn filenames_are_stable_and_distinct() {
        let a = CacheKey::podcast_lookup("123");
        let b = CacheKey::podcast_lookup("123");
        let c = CacheKey::podcast_lookup("456");

        assert_eq!(a.to_filename(), b.to_filename());
        assert_ne!(a.to_filename(), c.to_filename());
        assert_ne!(CacheKey::top_podcasts().to_filename(), a.to_filename());
    }

    #[test]
    fn metadata_new_uses_current_clock() {
        let metadata = CacheMetadata::new(Duration::from_secs(60));
        assert!(!metadata.is_expired());
        assert_eq!(metadata.ttl, 60_000);
    }
}
