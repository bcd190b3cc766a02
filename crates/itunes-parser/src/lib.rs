//! # iTunes Parser
//!
//! A library for parsing podcast directory data from the iTunes API.
//! Covers the two read-only endpoints a directory browser needs:
//!
//! - the top-podcasts RSS feed (`feed.entry[]`, every scalar wrapped in
//!   provider-specific `label`/`attributes` objects)
//! - the lookup endpoint (`results[]`, one flat array mixing podcast and
//!   episode records behind `wrapperType`/`kind` discriminators)
//!
//! The mappers are pure and total: records missing a usable identifier are
//! dropped per-record, and an empty upstream payload maps to an empty
//! result rather than an error.

pub mod catalog;
pub mod mapper;
pub mod models;

pub use catalog::{Episode, PodcastDetail, PodcastLookup, PodcastSummary};
pub use mapper::{FALLBACK_IMAGE_URL, map_podcast_lookup, map_top_podcasts};
pub use models::{PodcastLookupResponse, TopPodcastsResponse};
