//! # Castio Engine
//!
//! A library for browsing podcast directories resiliently. The upstream
//! directory frequently refuses cross-origin reads, so retrieval layers
//! a fast direct attempt over a race of CORS proxies, and every
//! successful result is persisted across two cache tiers so repeat views
//! are instant and survive restarts.
//!
//! ## Features
//!
//! - Direct-first JSON fetching with concurrent proxy fallback
//! - Two-tier caching (in-memory + durable disk) with lazy time-based
//!   expiry
//! - A high-level directory service returning normalized domain entities
//!   (via the `itunes-parser` crate)

pub mod builder;
pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod fetch;
pub mod proxy;

pub use builder::EngineConfigBuilder;
pub use cache::{CacheConfig, CacheKey, CacheManager};
pub use config::EngineConfig;
pub use error::{AttemptError, AttemptFailure, EngineError, FetchError};

// Re-export the fetcher surface
pub use fetch::{FetchOptions, fetch_json_smart};

// Re-export proxy utilities
pub use proxy::{ProxyEndpoint, ProxyResponseKind, default_proxies};

// Re-export the directory service
pub use directory::{DirectoryConfig, PodcastDirectory, create_client};

// Re-export the domain entities consumers render
pub use itunes_parser::{Episode, PodcastDetail, PodcastLookup, PodcastSummary};
