//! Bulk video detail lookups.

use crate::api::{self, HttpClient, Query};
use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

const VIDEO_KIND: &str = "youtube#video";
const VIDEO_FIELDS: &str = "items(contentDetails,id,kind,snippet)";

/// A fully described video as returned by the `videos` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    /// `publishedAt` exactly as the API sent it.
    pub published_raw: String,
    pub duration_raw: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Deserialize)]
struct RawVideo {
    id: String,
    snippet: RawSnippet,
    #[serde(rename = "contentDetails")]
    content_details: RawContentDetails,
}

#[derive(Debug, Deserialize)]
struct RawSnippet {
    title: String,
    description: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(rename = "publishedAt")]
    published_at: String,
    thumbnails: RawThumbnails,
}

#[derive(Debug, Deserialize)]
struct RawThumbnails {
    medium: RawThumbnail,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
struct RawContentDetails {
    duration: String,
}

impl TryFrom<RawVideo> for VideoRecord {
    type Error = FeedError;

    fn try_from(raw: RawVideo) -> FeedResult<Self> {
        let published_at = DateTime::parse_from_rfc3339(&raw.snippet.published_at)
            .map_err(|err| {
                FeedError::malformed(format!(
                    "video {} has invalid publishedAt {:?}: {err}",
                    raw.id, raw.snippet.published_at
                ))
            })?
            .with_timezone(&Utc);
        Ok(Self {
            id: raw.id,
            title: raw.snippet.title,
            description: raw.snippet.description,
            channel_title: raw.snippet.channel_title,
            published_at,
            published_raw: raw.snippet.published_at,
            duration_raw: raw.content_details.duration,
            thumbnail_url: raw.snippet.thumbnails.medium.url,
        })
    }
}

/// Fetches details for `video_ids`, `config.max_results` ids per request.
/// Output order follows the API, not the input.
pub fn fetch_details(
    client: &dyn HttpClient,
    config: &FeedConfig,
    video_ids: &[String],
) -> FeedResult<Vec<VideoRecord>> {
    let mut videos = Vec::with_capacity(video_ids.len());
    let mut batches = 0usize;
    for batch in video_ids.chunks(config.max_results.max(1)) {
        let query = Query::new("videos")
            .param("part", "snippet,contentDetails")
            .ids("id", batch)
            .param("maxResults", config.max_results)
            .param("fields", VIDEO_FIELDS);
        let page = api::fetch_page(client, config, &query, None)?;
        for item in page.items_of_kind(VIDEO_KIND) {
            let raw: RawVideo = api::decode(item, "video")?;
            videos.push(VideoRecord::try_from(raw)?);
        }
        batches += 1;
    }
    info!(requested = video_ids.len(), fetched = videos.len(), batches, "fetched video details");
    Ok(videos)
}
