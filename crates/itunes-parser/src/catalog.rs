//! Normalized domain entities produced by the mappers.
//!
//! These are the shapes consumers cache and render; they serialize cleanly
//! so cached copies survive process restarts unchanged.

use serde::{Deserialize, Serialize};

/// One entry of the top-podcasts listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastSummary {
    /// Directory identifier, stable across requests.
    pub id: String,
    pub title: String,
    pub author: String,
    /// URL of the largest artwork variant the feed offered.
    pub image_url: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub release_label: Option<String>,
}

/// Full podcast record from a lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastDetail {
    pub id: String,
    pub title: String,
    pub author: String,
    pub image_url: String,
    pub summary: Option<String>,
    pub category: Option<String>,
    pub release_label: Option<String>,
    pub description: Option<String>,
    pub total_episodes: u32,
    pub feed_url: Option<String>,
    pub collection_view_url: Option<String>,
}

/// One episode of a podcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Track identifier, falling back to the provider-issued guid.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub release_date: Option<String>,
    pub duration_ms: Option<u64>,
    /// Direct audio URL, when the directory exposes one.
    pub audio_url: Option<String>,
    /// Directory page for the episode.
    pub episode_url: Option<String>,
}

/// Outcome of a podcast lookup: the primary record (when the upstream
/// returned one) and its episodes in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodcastLookup {
    pub podcast: Option<PodcastDetail>,
    pub episodes: Vec<Episode>,
}
