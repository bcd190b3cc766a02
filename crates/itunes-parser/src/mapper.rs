//! Pure transforms from iTunes wire shapes into domain entities.
//!
//! Records missing a usable identifier are skipped, never turned into
//! errors; an empty upstream payload maps to an empty result.

use tracing::debug;

use crate::catalog::{Episode, PodcastDetail, PodcastLookup, PodcastSummary};
use crate::models::{
    FeedEntry, FeedImage, Label, LookupResult, PodcastLookupResponse, TopPodcastsResponse,
};

/// Artwork used when an entry carries no usable image variant.
pub const FALLBACK_IMAGE_URL: &str = "https://placehold.co/512x512?text=Podcast";

const UNKNOWN_TITLE: &str = "Unknown title";
const UNKNOWN_AUTHOR: &str = "Unknown author";
const UNTITLED_EPISODE: &str = "Untitled episode";

fn label_text(label: Option<&Label>) -> Option<String> {
    label.and_then(|l| l.label.clone())
}

fn image_height(image: &FeedImage) -> u32 {
    image
        .attributes
        .as_ref()
        .and_then(|attributes| attributes.height.as_deref())
        .and_then(|height| height.parse().ok())
        .unwrap_or(0)
}

/// Pick the variant with the numerically greatest declared height.
///
/// On ties the later variant wins; an empty list yields the fallback.
fn pick_image(images: &[FeedImage]) -> String {
    images
        .iter()
        .filter_map(|image| image.label.as_deref().map(|url| (url, image_height(image))))
        .max_by_key(|(_, height)| *height)
        .map(|(url, _)| url.to_owned())
        .unwrap_or_else(|| FALLBACK_IMAGE_URL.to_owned())
}

fn map_feed_entry(entry: &FeedEntry) -> Option<PodcastSummary> {
    let id = entry
        .id
        .as_ref()?
        .attributes
        .as_ref()?
        .id
        .clone()?;

    Some(PodcastSummary {
        id,
        title: label_text(entry.name.as_ref())
            .or_else(|| label_text(entry.title.as_ref()))
            .unwrap_or_else(|| UNKNOWN_TITLE.to_owned()),
        author: label_text(entry.artist.as_ref()).unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned()),
        image_url: pick_image(&entry.images),
        summary: label_text(entry.summary.as_ref()),
        category: entry
            .category
            .as_ref()
            .and_then(|category| category.attributes.as_ref())
            .and_then(|attributes| attributes.label.clone()),
        release_label: entry.release_date.as_ref().and_then(|release| {
            release
                .attributes
                .as_ref()
                .and_then(|attributes| attributes.label.clone())
                .or_else(|| release.label.clone())
        }),
    })
}

/// Map the top-podcasts feed into summaries, dropping entries without an
/// identifier.
pub fn map_top_podcasts(response: &TopPodcastsResponse) -> Vec<PodcastSummary> {
    let entries = response
        .feed
        .as_ref()
        .and_then(|feed| feed.entry.as_deref())
        .unwrap_or(&[]);

    entries
        .iter()
        .filter_map(|entry| {
            let mapped = map_feed_entry(entry);
            if mapped.is_none() {
                debug!("feed entry without identifier, skipping");
            }
            mapped
        })
        .collect()
}

fn is_podcast_record(result: &LookupResult) -> bool {
    result.wrapper_type.as_deref() == Some("track") && result.kind.as_deref() == Some("podcast")
}

fn is_collection_record(result: &LookupResult) -> bool {
    result.wrapper_type.as_deref() == Some("collection")
}

fn is_episode_record(result: &LookupResult) -> bool {
    result.wrapper_type.as_deref() == Some("podcastEpisode")
        || result.kind.as_deref() == Some("podcastEpisode")
}

fn map_podcast_record(result: &LookupResult) -> Option<PodcastDetail> {
    let id = result.collection_id.or(result.track_id)?;

    Some(PodcastDetail {
        id: id.to_string(),
        title: result
            .collection_name
            .clone()
            .or_else(|| result.track_name.clone())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_owned()),
        author: result
            .artist_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_owned()),
        image_url: result
            .artwork_url600
            .clone()
            .or_else(|| result.artwork_url512.clone())
            .or_else(|| result.artwork_url100.clone())
            .unwrap_or_else(|| FALLBACK_IMAGE_URL.to_owned()),
        summary: result
            .description
            .clone()
            .or_else(|| result.long_description.clone()),
        // The lookup endpoint never carries these feed-only fields.
        category: None,
        release_label: None,
        description: result
            .long_description
            .clone()
            .or_else(|| result.description.clone()),
        total_episodes: result.track_count.unwrap_or(0),
        feed_url: result.feed_url.clone(),
        collection_view_url: result.collection_view_url.clone(),
    })
}

fn map_episode_record(result: &LookupResult) -> Option<Episode> {
    let id = result
        .track_id
        .map(|id| id.to_string())
        .or_else(|| result.episode_guid.clone())?;

    Some(Episode {
        id,
        title: result
            .track_name
            .clone()
            .unwrap_or_else(|| UNTITLED_EPISODE.to_owned()),
        description: result
            .description
            .clone()
            .or_else(|| result.short_description.clone()),
        release_date: result.release_date.clone(),
        duration_ms: result.track_time_millis,
        audio_url: result
            .episode_url
            .clone()
            .or_else(|| result.preview_url.clone()),
        episode_url: result.track_view_url.clone(),
    })
}

/// Map a lookup response into the primary podcast record and its episodes.
///
/// The primary record is the first `track`/`podcast` result, falling back
/// to the first `collection` result. Episode records keep their upstream
/// order; records without a track id or guid are dropped.
pub fn map_podcast_lookup(response: &PodcastLookupResponse) -> PodcastLookup {
    let results = &response.results;

    let primary = results
        .iter()
        .find(|result| is_podcast_record(result))
        .or_else(|| results.iter().find(|result| is_collection_record(result)));

    let episodes = results
        .iter()
        .filter(|result| is_episode_record(result))
        .filter_map(|result| {
            let mapped = map_episode_record(result);
            if mapped.is_none() {
                debug!("episode record without identifier, skipping");
            }
            mapped
        })
        .collect();

    PodcastLookup {
        podcast: primary.and_then(map_podcast_record),
        episodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn top_response(value: serde_json::Value) -> TopPodcastsResponse {
        serde_json::from_value(value).unwrap()
    }

    fn lookup_response(value: serde_json::Value) -> PodcastLookupResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn maps_full_feed_entry() {
        let response = top_response(json!({
            "feed": {
                "entry": [{
                    "id": { "attributes": { "im:id": "123" } },
                    "im:name": { "label": "Test Podcast" },
                    "im:artist": { "label": "Test Artist" },
                    "im:image": [
                        { "label": "https://example.com/img.jpg", "attributes": { "height": "600" } }
                    ],
                    "summary": { "label": "Test summary" },
                    "category": { "attributes": { "label": "Music" } },
                    "im:releaseDate": { "label": "2024-01-01" }
                }]
            }
        }));

        let result = map_top_podcasts(&response);

        assert_eq!(result.len(), 1);
        assert_eq!(
            result[0],
            PodcastSummary {
                id: "123".to_owned(),
                title: "Test Podcast".to_owned(),
                author: "Test Artist".to_owned(),
                image_url: "https://example.com/img.jpg".to_owned(),
                summary: Some("Test summary".to_owned()),
                category: Some("Music".to_owned()),
                release_label: Some("2024-01-01".to_owned()),
            }
        );
    }

    #[test]
    fn falls_back_on_missing_optional_fields() {
        let response = top_response(json!({
            "feed": {
                "entry": [{
                    "id": { "attributes": { "im:id": "456" } },
                    "im:image": [],
                    "category": { "attributes": {} }
                }]
            }
        }));

        let result = map_top_podcasts(&response);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Unknown title");
        assert_eq!(result[0].author, "Unknown author");
        assert_eq!(result[0].image_url, FALLBACK_IMAGE_URL);
        assert_eq!(result[0].category, None);
        assert_eq!(result[0].summary, None);
    }

    #[test]
    fn drops_entries_without_id() {
        let response = top_response(json!({
            "feed": {
                "entry": [
                    {
                        "id": { "attributes": { "im:id": "123" } },
                        "im:name": { "label": "Valid Podcast" }
                    },
                    {
                        "id": { "attributes": {} },
                        "im:name": { "label": "Invalid Podcast" }
                    }
                ]
            }
        }));

        let result = map_top_podcasts(&response);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "Valid Podcast");
    }

    #[test]
    fn picks_tallest_image_variant() {
        let response = top_response(json!({
            "feed": {
                "entry": [{
                    "id": { "attributes": { "im:id": "789" } },
                    "im:image": [
                        { "label": "https://example.com/small.jpg", "attributes": { "height": "100" } },
                        { "label": "https://example.com/large.jpg", "attributes": { "height": "600" } },
                        { "label": "https://example.com/medium.jpg", "attributes": { "height": "300" } }
                    ]
                }]
            }
        }));

        let result = map_top_podcasts(&response);

        assert_eq!(result[0].image_url, "https://example.com/large.jpg");
    }

    #[test]
    fn title_prefers_name_over_title_label() {
        let response = top_response(json!({
            "feed": {
                "entry": [{
                    "id": { "attributes": { "im:id": "1" } },
                    "title": { "label": "Show - Artist" },
                    "im:name": { "label": "Show" }
                }]
            }
        }));

        assert_eq!(map_top_podcasts(&response)[0].title, "Show");
    }

    #[test]
    fn empty_feed_maps_to_empty_listing() {
        assert!(map_top_podcasts(&top_response(json!({}))).is_empty());
        assert!(map_top_podcasts(&top_response(json!({ "feed": {} }))).is_empty());
    }

    #[test]
    fn maps_lookup_with_episodes_in_order() {
        let response = lookup_response(json!({
            "resultCount": 3,
            "results": [
                {
                    "wrapperType": "collection",
                    "kind": "podcast",
                    "collectionId": 123,
                    "collectionName": "Test Podcast",
                    "artistName": "Test Artist",
                    "artworkUrl600": "https://example.com/img.jpg",
                    "trackCount": 2,
                    "description": "Short description",
                    "longDescription": "Long description",
                    "feedUrl": "https://example.com/feed.xml"
                },
                {
                    "wrapperType": "podcastEpisode",
                    "trackId": 1001,
                    "trackName": "Episode 1",
                    "description": "Episode 1 description",
                    "releaseDate": "2024-01-01T00:00:00Z",
                    "trackTimeMillis": 3_600_000u64,
                    "episodeUrl": "https://example.com/ep1.mp3",
                    "trackViewUrl": "https://example.com/ep1"
                },
                {
                    "wrapperType": "podcastEpisode",
                    "trackId": 1002,
                    "trackName": "Episode 2",
                    "releaseDate": "2024-01-02T00:00:00Z",
                    "trackTimeMillis": 5_400_000u64
                }
            ]
        }));

        let result = map_podcast_lookup(&response);

        let podcast = result.podcast.expect("podcast record");
        assert_eq!(podcast.id, "123");
        assert_eq!(podcast.title, "Test Podcast");
        assert_eq!(podcast.total_episodes, 2);
        assert_eq!(podcast.description.as_deref(), Some("Long description"));
        assert_eq!(podcast.feed_url.as_deref(), Some("https://example.com/feed.xml"));

        assert_eq!(result.episodes.len(), 2);
        assert_eq!(result.episodes[0].title, "Episode 1");
        assert_eq!(result.episodes[0].duration_ms, Some(3_600_000));
        assert_eq!(
            result.episodes[0].audio_url.as_deref(),
            Some("https://example.com/ep1.mp3")
        );
        assert_eq!(result.episodes[1].id, "1002");
    }

    #[test]
    fn prefers_primary_podcast_record_over_collection() {
        let response = lookup_response(json!({
            "results": [
                {
                    "wrapperType": "collection",
                    "collectionId": 1,
                    "collectionName": "Collection Record"
                },
                {
                    "wrapperType": "track",
                    "kind": "podcast",
                    "collectionId": 2,
                    "collectionName": "Primary Record"
                }
            ]
        }));

        let result = map_podcast_lookup(&response);

        assert_eq!(result.podcast.unwrap().title, "Primary Record");
    }

    #[test]
    fn primary_podcast_record_is_not_an_episode() {
        let response = lookup_response(json!({
            "results": [
                {
                    "wrapperType": "track",
                    "kind": "podcast",
                    "trackId": 42,
                    "trackName": "The Show"
                },
                {
                    "wrapperType": "track",
                    "kind": "podcastEpisode",
                    "trackId": 43,
                    "trackName": "The Episode"
                }
            ]
        }));

        let result = map_podcast_lookup(&response);

        assert_eq!(result.podcast.unwrap().title, "The Show");
        assert_eq!(result.episodes.len(), 1);
        assert_eq!(result.episodes[0].title, "The Episode");
    }

    #[test]
    fn episode_id_falls_back_to_guid() {
        let response = lookup_response(json!({
            "results": [
                {
                    "wrapperType": "podcastEpisode",
                    "episodeGuid": "guid-1",
                    "trackName": "Guid Only"
                },
                {
                    "wrapperType": "podcastEpisode",
                    "trackName": "No Identifier"
                }
            ]
        }));

        let result = map_podcast_lookup(&response);

        assert_eq!(result.episodes.len(), 1);
        assert_eq!(result.episodes[0].id, "guid-1");
    }

    #[test]
    fn empty_lookup_maps_to_empty_result() {
        let result = map_podcast_lookup(&lookup_response(json!({
            "resultCount": 0,
            "results": []
        })));

        assert!(result.podcast.is_none());
        assert!(result.episodes.is_empty());
    }

    #[test]
    fn collection_fallback_when_no_track_record() {
        let response = lookup_response(json!({
            "results": [{
                "wrapperType": "collection",
                "collectionId": 456,
                "collectionName": "Fallback Podcast",
                "artistName": "Artist",
                "artworkUrl600": "https://example.com/img.jpg",
                "trackCount": 0
            }]
        }));

        let result = map_podcast_lookup(&response);

        assert_eq!(result.podcast.unwrap().title, "Fallback Podcast");
    }
}
