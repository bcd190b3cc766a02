//! # Builder for EngineConfig
//!
//! This module provides a builder pattern implementation for creating and
//! customizing EngineConfig instances with a fluent API.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use castio_engine::EngineConfig;
//! use castio_engine::proxy::ProxyEndpoint;
//!
//! let config = EngineConfig::builder()
//!     .with_timeout_direct(Duration::from_millis(1500))
//!     .with_timeout_proxy(Duration::from_secs(10))
//!     .with_user_agent("MyApp/1.0")
//!     .with_header("X-Api-Key", "my-secret-key")
//!     .with_proxy_endpoint(ProxyEndpoint::raw("https://proxy.example/raw?url="))
//!     .with_caching_enabled(true)
//!     .build();
//! ```

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

use crate::cache::CacheConfig;
use crate::config::EngineConfig;
use crate::proxy::ProxyEndpoint;

/// Builder for creating EngineConfig instances with a fluent API
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    /// Internal config being built
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Set the cache configuration
    pub fn with_cache_config(mut self, cache_config: CacheConfig) -> Self {
        self.config.cache_config = Some(cache_config);
        self
    }

    /// Enable or disable caching
    pub fn with_caching_enabled(mut self, enabled: bool) -> Self {
        if enabled {
            if self.config.cache_config.is_none() {
                self.config.cache_config = Some(CacheConfig::default());
            }
        } else {
            self.config.cache_config = None;
        }
        self
    }

    /// Set the budget for the direct fetch attempt
    pub fn with_timeout_direct(mut self, timeout: Duration) -> Self {
        self.config.fetch_options.timeout_direct = timeout;
        self
    }

    /// Set the budget for each proxy fetch attempt
    pub fn with_timeout_proxy(mut self, timeout: Duration) -> Self {
        self.config.fetch_options.timeout_proxy = timeout;
        self
    }

    /// Set whether to attempt the origin directly before any proxy
    pub fn with_try_direct_first(mut self, try_direct_first: bool) -> Self {
        self.config.fetch_options.try_direct_first = try_direct_first;
        self
    }

    /// Replace the proxy endpoint list
    pub fn with_proxies(mut self, proxies: Vec<ProxyEndpoint>) -> Self {
        self.config.fetch_options.proxies = proxies;
        self
    }

    /// Append a proxy endpoint to the list
    pub fn with_proxy_endpoint(mut self, proxy: ProxyEndpoint) -> Self {
        self.config.fetch_options.proxies.push(proxy);
        self
    }

    /// Set the connection timeout (time to establish initial connection)
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set whether to follow redirects
    pub fn with_follow_redirects(mut self, follow: bool) -> Self {
        self.config.follow_redirects = follow;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Add a custom HTTP header
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        if let (Ok(name), Ok(value)) = (
            name.as_ref().parse::<reqwest::header::HeaderName>(),
            HeaderValue::from_str(value.as_ref()),
        ) {
            self.config.headers.insert(name, value);
        }
        self
    }

    /// Set all HTTP headers, replacing any existing headers
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.config.headers = headers;
        self
    }

    /// Build the EngineConfig instance
    pub fn build(self) -> EngineConfig {
        self.config
    }
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
