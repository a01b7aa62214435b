use serde_json::{Value, json};
use std::cell::RefCell;
use ytsubs_feed::api::HttpClient;
use ytsubs_feed::config::FeedConfig;
use ytsubs_feed::pipeline;
use ytsubs_feed::{FeedError, FeedResult};

/// Answers by matching a URL fragment, so the test does not depend on the
/// exact request order within a stage.
struct RoutedClient {
    routes: Vec<(&'static str, Value)>,
    requests: RefCell<Vec<String>>,
}

impl RoutedClient {
    fn new(routes: Vec<(&'static str, Value)>) -> Self {
        Self {
            routes,
            requests: RefCell::new(Vec::new()),
        }
    }
}

impl HttpClient for RoutedClient {
    fn get_json(&self, url: &str) -> FeedResult<Value> {
        self.requests.borrow_mut().push(url.to_string());
        self.routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| FeedError::transport(format!("unexpected request {url}")))
    }
}

fn playlist(ids: &[&str]) -> Value {
    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({"kind": "youtube#playlistItem", "contentDetails": {"videoId": id}}))
        .collect();
    json!({ "items": items })
}

fn video(id: &str, channel: &str, published: &str, duration: &str) -> Value {
    json!({
        "kind": "youtube#video",
        "id": id,
        "snippet": {
            "title": format!("{id} & more"),
            "description": "first\nsecond",
            "channelTitle": channel,
            "publishedAt": published,
            "thumbnails": {"medium": {"url": format!("https://img/{id}.jpg")}}
        },
        "contentDetails": {"duration": duration}
    })
}

fn config() -> FeedConfig {
    FeedConfig::new("SECRET").with_api_base("http://api.test/youtube/v3")
}

#[test]
fn builds_sorted_feed_from_subscriptions() {
    let client = RoutedClient::new(vec![
        ("channels?part=id&forUsername=alice", json!({"items": [{"kind": "youtube#channel", "id": "UCalice"}]})),
        ("subscriptions?part=snippet&channelId=UCalice", json!({"items": [
            {"kind": "youtube#subscription", "snippet": {"resourceId": {"channelId": "UCa"}}},
            {"kind": "youtube#subscription", "snippet": {"resourceId": {"channelId": "UCb"}}},
            {"kind": "youtube#subscription", "snippet": {"resourceId": {"channelId": "UCnone"}}}
        ]})),
        ("channels?part=contentDetails&id=UCa%2CUCb%2CUCnone", json!({"items": [
            {"kind": "youtube#channel", "id": "UCa", "contentDetails": {"relatedPlaylists": {"uploads": "UUa"}}},
            {"kind": "youtube#channel", "id": "UCb", "contentDetails": {"relatedPlaylists": {"uploads": "UUb"}}},
            {"kind": "youtube#channel", "id": "UCnone"}
        ]})),
        ("playlistId=UUa", playlist(&["a1", "a2"])),
        ("playlistId=UUb", playlist(&["b1"])),
        ("videos?part=snippet%2CcontentDetails&id=a1%2Ca2%2Cb1", json!({"items": [
            video("a1", "Alpha", "2024-01-01T10:00:00Z", "PT1H37M15S"),
            video("a2", "Alpha", "2023-12-30T10:00:00Z", "PT37M15S"),
            video("b1", "Beta", "2024-01-02T10:00:00Z", "P1W2DT6H21M32S")
        ]})),
    ]);

    let entries = pipeline::collect_entries(&client, &config(), "alice").unwrap();

    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "a1", "a2"]);
    assert_eq!(entries[0].duration, "1w 54:21:32");
    assert_eq!(entries[1].duration, "1:37:15");
    assert_eq!(entries[2].duration, "37:15");
    assert_eq!(entries[0].title, "b1 &amp; more");
    assert_eq!(entries[0].description, "first<br />second");
    assert_eq!(entries[0].link, "https://youtube.com/watch?v=b1");
    assert_eq!(entries[0].pub_date, "2024-01-02T10:00:00Z");

    let requests = client.requests.borrow();
    assert_eq!(requests.len(), 6);
    assert!(requests.iter().all(|url| url.ends_with("key=SECRET")));
}

#[test]
fn malformed_video_payload_aborts_the_run() {
    let client = RoutedClient::new(vec![
        ("forUsername", json!({"items": [{"id": "UCme"}]})),
        ("subscriptions", json!({"items": [
            {"kind": "youtube#subscription", "snippet": {"resourceId": {"channelId": "UCa"}}}
        ]})),
        ("channels?part=contentDetails", json!({"items": [
            {"kind": "youtube#channel", "id": "UCa", "contentDetails": {"relatedPlaylists": {"uploads": "UUa"}}}
        ]})),
        ("playlistItems", playlist(&["a1"])),
        ("videos", json!({"error": {"code": 403}})),
    ]);

    let err = pipeline::collect_entries(&client, &config(), "me").unwrap_err();
    assert!(matches!(err, FeedError::MalformedResponse(_)));
}
