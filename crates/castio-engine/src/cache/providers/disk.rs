//! # Disk Cache Provider
//!
//! Durable cache tier persisting one JSON record per key. Records survive
//! process restarts; expiry is lazy, applied on the first read past the
//! entry's time-to-live.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use tokio::fs;
use tokio::io;
use tracing::{debug, warn};

use crate::cache::types::{
    CacheKey, CacheLookupResult, CacheMetadata, CacheResourceType, CacheResult, CacheStatus,
};

use super::CacheProvider;

/// On-disk record layout: the serialized payload together with its
/// freshness metadata, one JSON document per key.
#[derive(Serialize)]
struct EnvelopeRef<'a> {
    data: &'a RawValue,
    timestamp: u64,
    ttl: u64,
}

#[derive(Deserialize)]
struct Envelope {
    data: Box<RawValue>,
    timestamp: u64,
    ttl: u64,
}

#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
    initialized: Arc<AtomicBool>,
    enabled: bool,
}

impl DiskCache {
    /// Create a new disk cache rooted at the specified directory.
    pub fn new(cache_dir: PathBuf, enabled: bool) -> Self {
        Self {
            cache_dir,
            initialized: Arc::new(AtomicBool::new(false)),
            enabled,
        }
    }

    /// Initialize the cache directories.
    pub(crate) async fn ensure_initialized(&self) -> io::Result<()> {
        // Fast path - already initialized
        if self.initialized.load(Ordering::Relaxed) {
            return Ok(());
        }

        // Not enabled, nothing to initialize
        if !self.enabled {
            return Ok(());
        }

        // Use compare_exchange to ensure only one task initializes
        if self
            .initialized
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
        {
            fs::create_dir_all(&self.cache_dir).await?;

            // Create subdirectories for the resource types
            for res_type in &[
                CacheResourceType::TopPodcasts,
                CacheResourceType::PodcastLookup,
            ] {
                fs::create_dir_all(self.cache_dir.join(format!("{res_type:?}"))).await?;
            }

            self.initialized.store(true, Ordering::Release);
        } else {
            // Another task is initializing, wait for it to complete
            while !self.initialized.load(Ordering::Acquire) {
                tokio::task::yield_now().await;
            }
        }

        Ok(())
    }

    /// Path of the record for a key.
    fn record_path(&self, key: &CacheKey) -> PathBuf {
        self.cache_dir
            .join(format!("{:?}", key.resource_type))
            .join(format!("{}.json", key.to_filename()))
    }

    /// Read and parse the record for a key. Absent records read as `None`;
    /// corrupt records are evicted and read as `None`.
    async fn read_envelope(&self, key: &CacheKey) -> io::Result<Option<Envelope>> {
        let path = self.record_path(key);

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!(path = ?path, error = %e, "failed to read cache record");
                return Ok(None);
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(envelope) => Ok(Some(envelope)),
            Err(e) => {
                warn!(path = ?path, error = %e, "failed to parse cache record, evicting");
                let _ = fs::remove_file(&path).await;
                Ok(None)
            }
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for DiskCache {
    async fn get(&self, key: &CacheKey) -> CacheLookupResult {
        if !self.enabled {
            return Ok(None);
        }

        self.ensure_initialized().await?;

        let Some(envelope) = self.read_envelope(key).await? else {
            return Ok(None);
        };

        let metadata = CacheMetadata {
            timestamp: envelope.timestamp,
            ttl: envelope.ttl,
        };
        let data = Bytes::copy_from_slice(envelope.data.get().as_bytes());

        // Lazy expiry: stale records are deleted on the read that finds
        // them stale, never by a background sweep.
        if metadata.is_expired() {
            debug!(key = ?key, "disk cache record expired, deleting");
            let _ = fs::remove_file(self.record_path(key)).await;
            return Ok(Some((data, metadata, CacheStatus::Expired)));
        }

        Ok(Some((data, metadata, CacheStatus::Hit)))
    }

    async fn put(&self, key: CacheKey, data: Bytes, metadata: CacheMetadata) -> CacheResult<()> {
        // Write failures are non-fatal: a miss on the next read is an
        // acceptable degradation, so every failure path logs and returns Ok.
        if !self.enabled {
            return Ok(());
        }

        if let Err(e) = self.ensure_initialized().await {
            warn!(error = %e, "failed to initialize cache directory");
            return Ok(());
        }

        let text = match std::str::from_utf8(&data) {
            Ok(text) => text,
            Err(e) => {
                warn!(key = ?key, error = %e, "refusing to persist non-UTF-8 payload");
                return Ok(());
            }
        };
        let raw: &RawValue = match serde_json::from_str(text) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = ?key, error = %e, "refusing to persist non-JSON payload");
                return Ok(());
            }
        };

        let envelope = EnvelopeRef {
            data: raw,
            timestamp: metadata.timestamp,
            ttl: metadata.ttl,
        };
        let json = match serde_json::to_vec(&envelope) {
            Ok(json) => json,
            Err(e) => {
                warn!(key = ?key, error = %e, "failed to serialize cache record");
                return Ok(());
            }
        };

        let path = self.record_path(&key);
        let temp_path = path.with_extension("tmp");

        // Write to a temporary file first, then rename into place so a
        // crashed write never leaves a half-written record behind.
        if let Err(e) = fs::write(&temp_path, &json).await {
            warn!(path = ?temp_path, error = %e, "failed to write cache record");
            return Ok(());
        }

        if let Err(e) = fs::rename(&temp_path, &path).await {
            warn!(from = ?temp_path, to = ?path, error = %e, "failed to finalize cache record");
            let _ = fs::remove_file(&temp_path).await;
            return Ok(());
        }

        debug!(key = ?key, "cached record to disk");
        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> CacheResult<()> {
        if !self.enabled {
            return Ok(());
        }

        self.ensure_initialized().await?;

        let path = self.record_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                warn!(path = ?path, error = %e, "failed to remove cache record");
                Ok(())
            }
        }
    }

    async fn clear(&self) -> CacheResult<()> {
        if !self.enabled {
            return Ok(());
        }

        self.ensure_initialized().await?;

        let mut entries = match fs::read_dir(&self.cache_dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = ?self.cache_dir, error = %e, "failed to read cache directory");
                return Ok(());
            }
        };

        let mut removed = 0usize;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let result = if path.is_dir() {
                fs::remove_dir_all(&path).await
            } else {
                fs::remove_file(&path).await
            };
            match result {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = ?path, error = %e, "failed to remove cache entry"),
            }
        }

        debug!(count = removed, "cleared disk cache");

        // Recreate the resource-type subdirectories
        self.initialized.store(false, Ordering::Relaxed);
        self.ensure_initialized().await?;

        Ok(())
    }

    async fn is_expired(&self, key: &CacheKey) -> CacheResult<bool> {
        if !self.enabled {
            return Ok(true);
        }

        self.ensure_initialized().await?;

        Ok(self
            .read_envelope(key)
            .await?
            .map(|envelope| {
                CacheMetadata {
                    timestamp: envelope.timestamp,
                    ttl: envelope.ttl,
                }
                .is_expired()
            })
            .unwrap_or(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::types::epoch_millis;
    use std::time::Duration;
    use tempfile::TempDir;

    fn cache_in(dir: &TempDir) -> DiskCache {
        DiskCache::new(dir.path().join("cache"), true)
    }

    fn key(name: &str) -> CacheKey {
        CacheKey::podcast_lookup(name)
    }

    fn payload(json: &str) -> Bytes {
        Bytes::from(json.to_owned())
    }

    #[tokio::test]
    async fn round_trip_preserves_payload() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let k = key("round-trip");
        let d = payload(r#"{"title":"A Show","episodes":[1,2,3]}"#);

        cache
            .put(k.clone(), d.clone(), CacheMetadata::new(Duration::from_secs(60)))
            .await
            .unwrap();

        match cache.get(&k).await.unwrap() {
            Some((res_d, metadata, CacheStatus::Hit)) => {
                assert_eq!(res_d, d);
                assert_eq!(metadata.ttl, 60_000);
            }
            other => panic!("expected hit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn records_survive_a_new_instance() {
        let dir = TempDir::new().unwrap();
        let k = key("persisted");
        let d = payload(r#"{"value":42}"#);

        let first = cache_in(&dir);
        first
            .put(k.clone(), d.clone(), CacheMetadata::new(Duration::from_secs(60)))
            .await
            .unwrap();

        // A fresh instance over the same directory resolves the same record.
        let second = cache_in(&dir);
        let (res_d, _, status) = second.get(&k).await.unwrap().expect("record");
        assert_eq!(res_d, d);
        assert_eq!(status, CacheStatus::Hit);
    }

    #[tokio::test]
    async fn expired_record_is_deleted_on_read() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let k = key("stale");
        let metadata = CacheMetadata {
            timestamp: epoch_millis().saturating_sub(10_000),
            ttl: 5_000,
        };

        cache
            .put(k.clone(), payload(r#""old""#), metadata)
            .await
            .unwrap();

        match cache.get(&k).await.unwrap() {
            Some((_, _, CacheStatus::Expired)) => {}
            other => panic!("expected expired, got {other:?}"),
        }

        assert!(cache.get(&k).await.unwrap().is_none());
        assert!(cache.is_expired(&k).await.unwrap());
    }

    #[tokio::test]
    async fn corrupt_record_reads_as_absent_and_is_evicted() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let k = key("corrupt");

        cache
            .put(k.clone(), payload(r#"{"ok":true}"#), CacheMetadata::new(Duration::from_secs(60)))
            .await
            .unwrap();

        let path = cache.record_path(&k);
        fs::write(&path, b"{not json").await.unwrap();

        assert!(cache.get(&k).await.unwrap().is_none());
        assert!(!path.exists(), "corrupt record should be evicted");
    }

    #[tokio::test]
    async fn non_json_payload_is_not_persisted() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let k = key("binary");

        cache
            .put(k.clone(), Bytes::from_static(b"\xff\xfe"), CacheMetadata::new(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(cache.get(&k).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn is_expired_for_absent_record() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);

        assert!(cache.is_expired(&key("ghost")).await.unwrap());
    }

    #[tokio::test]
    async fn remove_and_clear_are_unconditional() {
        let dir = TempDir::new().unwrap();
        let cache = cache_in(&dir);
        let k1 = key("one");
        let k2 = key("two");
        let meta = || CacheMetadata::new(Duration::from_secs(60));

        cache.put(k1.clone(), payload("1"), meta()).await.unwrap();
        cache.put(k2.clone(), payload("2"), meta()).await.unwrap();

        cache.remove(&k1).await.unwrap();
        assert!(cache.get(&k1).await.unwrap().is_none());
        assert!(cache.get(&k2).await.unwrap().is_some());

        // Removing a missing record is not an error
        cache.remove(&k1).await.unwrap();

        cache.clear().await.unwrap();
        assert!(cache.get(&k2).await.unwrap().is_none());

        // The cache stays usable after a clear
        cache.put(k2.clone(), payload("3"), meta()).await.unwrap();
        assert!(cache.get(&k2).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn disabled_cache_reads_and_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let cache = DiskCache::new(dir.path().join("cache"), false);
        let k = key("noop");

        cache
            .put(k.clone(), payload("1"), CacheMetadata::new(Duration::from_secs(60)))
            .await
            .unwrap();

        assert!(cache.get(&k).await.unwrap().is_none());
        assert!(cache.is_expired(&k).await.unwrap());
        assert!(!dir.path().join("cache").exists());
    }
}
