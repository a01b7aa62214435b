//! Username → channel id → uploads playlists of every subscribed channel.
//!
//! The subscriptions endpoint cannot return the uploads playlist id, so the
//! collected channel ids are resolved through a second, bulk `channels`
//! lookup (50 ids per request).

use crate::api::{self, HttpClient, Query};
use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use serde::Deserialize;
use tracing::{info, warn};

const SUBSCRIPTION_KIND: &str = "youtube#subscription";
const CHANNEL_KIND: &str = "youtube#channel";

#[derive(Debug, Deserialize)]
struct ChannelRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SubscriptionItem {
    snippet: SubscriptionSnippet,
}

#[derive(Debug, Deserialize)]
struct SubscriptionSnippet {
    #[serde(rename = "resourceId")]
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
struct ResourceId {
    #[serde(rename = "channelId")]
    channel_id: String,
}

/// Everything below `contentDetails` is optional: plenty of channels have no
/// uploads playlist at all.
#[derive(Debug, Deserialize)]
struct ChannelDetails {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "contentDetails", default)]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    #[serde(rename = "relatedPlaylists", default)]
    related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    #[serde(default)]
    uploads: Option<String>,
}

impl ChannelDetails {
    fn uploads(self) -> Option<String> {
        self.content_details?
            .related_playlists?
            .uploads
            .filter(|id| !id.is_empty())
    }
}

/// Looks up the channel id owned by `username`.
pub fn channel_for_user(
    client: &dyn HttpClient,
    config: &FeedConfig,
    username: &str,
) -> FeedResult<String> {
    let query = Query::new("channels")
        .param("part", "id")
        .param("forUsername", username);
    let page = api::fetch_page(client, config, &query, None)?;
    let first = page
        .items
        .into_iter()
        .next()
        .ok_or_else(|| FeedError::malformed(format!("no channel found for user {username:?}")))?;
    let channel: ChannelRef = api::decode(first, "channel lookup")?;
    info!(username, channel = %channel.id, "resolved channel");
    Ok(channel.id)
}

/// Channel ids `channel_id` is subscribed to, across every page.
pub fn subscribed_channels(
    client: &dyn HttpClient,
    config: &FeedConfig,
    channel_id: &str,
) -> FeedResult<Vec<String>> {
    let query = Query::new("subscriptions")
        .param("part", "snippet")
        .param("channelId", channel_id)
        .param("maxResults", config.max_results);
    api::execute(client, config, &query, SUBSCRIPTION_KIND)?
        .into_iter()
        .map(|item| {
            api::decode::<SubscriptionItem>(item, "subscription")
                .map(|sub| sub.snippet.resource_id.channel_id)
        })
        .collect()
}

/// Resolves each channel to its uploads playlist, `max_results` ids per
/// request. Channels without one are skipped.
pub fn uploads_playlists(
    client: &dyn HttpClient,
    config: &FeedConfig,
    channel_ids: &[String],
) -> FeedResult<Vec<String>> {
    let mut playlists = Vec::with_capacity(channel_ids.len());
    for batch in channel_ids.chunks(config.max_results.max(1)) {
        let query = Query::new("channels")
            .param("part", "contentDetails")
            .ids("id", batch)
            .param("maxResults", config.max_results);
        let page = api::fetch_page(client, config, &query, None)?;
        for item in page.items_of_kind(CHANNEL_KIND) {
            let details: ChannelDetails = api::decode(item, "channel details")?;
            let id = details.id.clone().unwrap_or_default();
            match details.uploads() {
                Some(uploads) => playlists.push(uploads),
                None => warn!(channel = %id, "channel has no uploads playlist, skipping"),
            }
        }
    }
    Ok(playlists)
}

/// Uploads playlist ids for every channel `channel_id` subscribes to.
pub fn resolve_upload_playlists(
    client: &dyn HttpClient,
    config: &FeedConfig,
    channel_id: &str,
) -> FeedResult<Vec<String>> {
    let channels = subscribed_channels(client, config, channel_id)?;
    let playlists = uploads_playlists(client, config, &channels)?;
    info!(
        subscriptions = channels.len(),
        playlists = playlists.len(),
        "resolved uploads playlists"
    );
    Ok(playlists)
}
