//! Wire models for the iTunes directory endpoints.
//!
//! Every field is optional: the upstream feed omits fields freely and the
//! lookup endpoint mixes record shapes in one array, so the models accept
//! whatever arrives and leave validation to the mappers.

use serde::Deserialize;

/// Response of the top-podcasts RSS feed endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct TopPodcastsResponse {
    pub feed: Option<Feed>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Feed {
    pub entry: Option<Vec<FeedEntry>>,
}

/// One entry of the top-podcasts feed.
///
/// The feed wraps scalars in `label` objects and puts identifiers and
/// image dimensions behind `attributes` objects.
#[derive(Debug, Default, Deserialize)]
pub struct FeedEntry {
    pub id: Option<EntryId>,
    pub title: Option<Label>,
    pub summary: Option<Label>,
    #[serde(rename = "im:name")]
    pub name: Option<Label>,
    #[serde(rename = "im:artist")]
    pub artist: Option<Label>,
    #[serde(rename = "im:image", default)]
    pub images: Vec<FeedImage>,
    pub category: Option<Category>,
    #[serde(rename = "im:releaseDate")]
    pub release_date: Option<ReleaseDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Label {
    pub label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryId {
    pub attributes: Option<EntryIdAttributes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntryIdAttributes {
    #[serde(rename = "im:id")]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedImage {
    pub label: Option<String>,
    pub attributes: Option<ImageAttributes>,
}

/// Image dimensions arrive as strings ("55", "170", "600").
#[derive(Debug, Default, Deserialize)]
pub struct ImageAttributes {
    pub height: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Category {
    pub attributes: Option<CategoryAttributes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryAttributes {
    pub label: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReleaseDate {
    pub label: Option<String>,
    pub attributes: Option<ReleaseDateAttributes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReleaseDateAttributes {
    pub label: Option<String>,
}

/// Response of the lookup endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PodcastLookupResponse {
    #[serde(default)]
    pub result_count: u32,
    #[serde(default)]
    pub results: Vec<LookupResult>,
}

/// One record of the heterogeneous lookup `results` array.
///
/// Podcast and episode records share this shape; `wrapper_type` and `kind`
/// discriminate between them.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupResult {
    pub wrapper_type: Option<String>,
    pub kind: Option<String>,
    pub collection_id: Option<u64>,
    pub track_id: Option<u64>,
    pub episode_guid: Option<String>,
    pub collection_name: Option<String>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub artwork_url100: Option<String>,
    pub artwork_url512: Option<String>,
    pub artwork_url600: Option<String>,
    pub description: Option<String>,
    pub long_description: Option<String>,
    pub short_description: Option<String>,
    pub release_date: Option<String>,
    pub track_time_millis: Option<u64>,
    pub track_count: Option<u32>,
    pub feed_url: Option<String>,
    pub collection_view_url: Option<String>,
    pub track_view_url: Option<String>,
    pub episode_url: Option<String>,
    pub preview_url: Option<String>,
}
