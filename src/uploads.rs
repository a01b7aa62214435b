//! Most recent video ids of an uploads playlist.

use crate::api::{self, HttpClient, Query};
use crate::config::FeedConfig;
use crate::error::FeedResult;
use serde::Deserialize;

const PLAYLIST_ITEM_KIND: &str = "youtube#playlistItem";

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(rename = "contentDetails")]
    content_details: PlaylistItemDetails,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemDetails {
    #[serde(rename = "videoId")]
    video_id: String,
}

/// Up to `config.playlist_depth` ids in the order the API lists them. Only
/// the first page is read. An empty playlist id issues no request.
pub fn recent_video_ids(
    client: &dyn HttpClient,
    config: &FeedConfig,
    playlist_id: &str,
) -> FeedResult<Vec<String>> {
    if playlist_id.is_empty() {
        return Ok(Vec::new());
    }
    let query = Query::new("playlistItems")
        .param("part", "contentDetails")
        .param("playlistId", playlist_id)
        .param("maxResults", config.playlist_depth);
    let page = api::fetch_page(client, config, &query, None)?;
    page.items_of_kind(PLAYLIST_ITEM_KIND)
        .take(config.playlist_depth)
        .map(|item| {
            api::decode::<PlaylistItem>(item, "playlist item")
                .map(|item| item.content_details.video_id)
        })
        .collect()
}

/// Concatenates [`recent_video_ids`] over `playlists`, preserving order.
pub fn recent_uploads(
    client: &dyn HttpClient,
    config: &FeedConfig,
    playlists: &[String],
) -> FeedResult<Vec<String>> {
    let mut ids = Vec::new();
    for playlist in playlists {
        ids.extend(recent_video_ids(client, config, playlist)?);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedClient;
    use crate::error::FeedError;
    use serde_json::{Value, json};

    fn item(video: &str) -> Value {
        json!({"kind": "youtube#playlistItem", "contentDetails": {"videoId": video}})
    }

    fn config() -> FeedConfig {
        FeedConfig::new("KEY").with_api_base("http://api.test")
    }

    #[test]
    fn empty_playlist_id_skips_request() {
        let client = ScriptedClient::new(vec![]);
        assert!(recent_video_ids(&client, &config(), "").unwrap().is_empty());
        assert!(client.requests().is_empty());
    }

    #[test]
    fn keeps_api_order_and_caps_at_depth() {
        let client = ScriptedClient::new(vec![json!({
            "items": [item("v1"), item("v2"), {"kind": "youtube#other"}, item("v3"),
                      item("v4"), item("v5"), item("v6")],
            "nextPageToken": "ignored"
        })]);
        let ids = recent_video_ids(&client, &config(), "UU1").unwrap();
        assert_eq!(ids, vec!["v1", "v2", "v3", "v4", "v5"]);
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].contains("playlistId=UU1&maxResults=5"));
    }

    #[test]
    fn recent_uploads_concatenates_playlists() {
        let client = ScriptedClient::new(vec![
            json!({"items": [item("a1"), item("a2")]}),
            json!({"items": [item("b1")]}),
        ]);
        let ids = recent_uploads(&client, &config(), &["UUA".into(), "UUB".into()]).unwrap();
        assert_eq!(ids, vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn missing_video_id_is_malformed() {
        let client = ScriptedClient::new(vec![json!({
            "items": [{"kind": "youtube#playlistItem", "contentDetails": {}}]
        })]);
        let err = recent_video_ids(&client, &config(), "UU1").unwrap_err();
        assert!(matches!(err, FeedError::MalformedResponse(_)));
    }
}
