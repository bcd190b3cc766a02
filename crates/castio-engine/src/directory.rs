//! # Podcast Directory
//!
//! High-level service combining the resilient fetcher, the two-tier cache
//! and the response mappers: consumers ask for domain entities by id and
//! get cached copies when fresh ones exist.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use rustls::ClientConfig as TlsClientConfig;
use rustls_platform_verifier::BuilderVerifierExt;
use tracing::{debug, info};

use itunes_parser::{
    PodcastLookup, PodcastLookupResponse, PodcastSummary, TopPodcastsResponse,
    map_podcast_lookup, map_top_podcasts,
};

use crate::cache::{CacheConfig, CacheKey, CacheManager};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::fetch::{FetchOptions, fetch_json_smart};

/// Create a reqwest Client with the provided configuration
pub fn create_client(config: &EngineConfig) -> Result<Client, EngineError> {
    // Create the crypto provider
    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());

    // Build platform default TLS configuration
    let tls_config = TlsClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .expect("Failed to configure default TLS protocol versions")
        .with_platform_verifier()
        .map_err(|e| EngineError::TlsError(e.to_string()))?
        .with_no_client_auth();

    let mut client_builder = Client::builder()
        .pool_max_idle_per_host(5) // Allow multiple connections to same host
        .user_agent(&config.user_agent)
        .default_headers(config.headers.clone())
        .use_preconfigured_tls(tls_config)
        .redirect(if config.follow_redirects {
            reqwest::redirect::Policy::limited(10)
        } else {
            reqwest::redirect::Policy::none()
        });

    if !config.connect_timeout.is_zero() {
        client_builder = client_builder.connect_timeout(config.connect_timeout);
    }

    client_builder.build().map_err(EngineError::from)
}

/// iTunes top-podcasts feed (top 100, podcasts genre)
const TOP_PODCASTS_URL: &str =
    "https://itunes.apple.com/us/rss/toppodcasts/limit=100/genre=1310/json";

/// iTunes lookup endpoint
const LOOKUP_URL: &str = "https://itunes.apple.com/lookup";

/// Default TTL for cached directory resources
const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the PodcastDirectory
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Endpoint serving the top-podcasts feed
    pub top_podcasts_url: String,
    /// Lookup endpoint; query parameters are appended per podcast
    pub lookup_url: String,
    /// TTL for the cached top-podcasts listing
    pub top_podcasts_ttl: Duration,
    /// TTL for cached lookup results
    pub lookup_ttl: Duration,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            top_podcasts_url: TOP_PODCASTS_URL.to_owned(),
            lookup_url: LOOKUP_URL.to_owned(),
            top_podcasts_ttl: DEFAULT_TTL,
            lookup_ttl: DEFAULT_TTL,
        }
    }
}

/// High-level podcast directory client.
///
/// Owns the HTTP client and the cache; every operation goes through the
/// cache first and only reaches the network on a miss.
pub struct PodcastDirectory {
    client: Client,
    cache: CacheManager,
    fetch_options: FetchOptions,
    config: DirectoryConfig,
}

impl PodcastDirectory {
    /// Create a new directory client with default endpoints and TTLs.
    pub async fn new(engine_config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_config(engine_config, DirectoryConfig::default()).await
    }

    /// Create a new directory client with custom configuration.
    pub async fn with_config(
        engine_config: EngineConfig,
        config: DirectoryConfig,
    ) -> Result<Self, EngineError> {
        let client = create_client(&engine_config)?;

        let cache_config = match engine_config.cache_config {
            Some(cache_config) => cache_config,
            None => CacheConfig {
                enabled: false,
                ..CacheConfig::default()
            },
        };
        let cache = CacheManager::new(cache_config).await?;

        info!(
            top_podcasts_url = %config.top_podcasts_url,
            caching = cache.config().enabled,
            "podcast directory ready"
        );

        Ok(Self {
            client,
            cache,
            fetch_options: engine_config.fetch_options,
            config,
        })
    }

    /// Top podcasts listing, cached for
    /// [`top_podcasts_ttl`](DirectoryConfig::top_podcasts_ttl).
    pub async fn top_podcasts(&self) -> Result<Vec<PodcastSummary>, EngineError> {
        let key = CacheKey::top_podcasts();
        let client = &self.client;
        let url = &self.config.top_podcasts_url;
        let fetch_options = &self.fetch_options;

        self.cache
            .get_or_fetch(&key, self.config.top_podcasts_ttl, || async move {
                let response: TopPodcastsResponse =
                    fetch_json_smart(client, url, fetch_options).await?;

                let podcasts = map_top_podcasts(&response);
                debug!(count = podcasts.len(), "mapped top podcasts");
                Ok::<_, EngineError>(podcasts)
            })
            .await
    }

    /// Podcast detail and episode list, cached for
    /// [`lookup_ttl`](DirectoryConfig::lookup_ttl).
    ///
    /// An id the directory does not know yields an empty lookup, not an
    /// error.
    pub async fn podcast_lookup(&self, podcast_id: &str) -> Result<PodcastLookup, EngineError> {
        let key = CacheKey::podcast_lookup(podcast_id);
        let url = self.lookup_url(podcast_id);
        let client = &self.client;
        let fetch_options = &self.fetch_options;

        self.cache
            .get_or_fetch(&key, self.config.lookup_ttl, || async move {
                let response: PodcastLookupResponse =
                    fetch_json_smart(client, &url, fetch_options).await?;

                let lookup = map_podcast_lookup(&response);
                debug!(
                    podcast_id,
                    episodes = lookup.episodes.len(),
                    found = lookup.podcast.is_some(),
                    "mapped podcast lookup"
                );
                Ok::<_, EngineError>(lookup)
            })
            .await
    }

    /// Evict a podcast's cached lookup record.
    pub async fn invalidate_podcast(&self, podcast_id: &str) {
        self.cache.remove(&CacheKey::podcast_lookup(podcast_id)).await;
    }

    /// Evict every cached directory resource.
    pub async fn invalidate_all(&self) {
        self.cache.clear().await;
    }

    /// Access the underlying cache.
    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    fn lookup_url(&self, podcast_id: &str) -> String {
        format!(
            "{}?id={}&media=podcast&entity=podcastEpisode",
            self.config.lookup_url, podcast_id
        )
    }
}
