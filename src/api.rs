//! HTTP plumbing for the YouTube Data API.
//!
//! The pipeline only ever needs "GET this URL, hand me the JSON", so that is
//! the whole [`HttpClient`] surface. [`UreqClient`] is the production
//! implementation; tests swap in scripted fakes.

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("ytsubs-feed/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Issues a GET and returns the decoded JSON body.
pub trait HttpClient {
    fn get_json(&self, url: &str) -> FeedResult<Value>;
}

/// Blocking client backed by a shared `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self { agent }
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for UreqClient {
    fn get_json(&self, url: &str) -> FeedResult<Value> {
        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, response)) => {
                let body = response.into_string().unwrap_or_default();
                return Err(FeedError::transport(format!(
                    "HTTP {code}: {}",
                    body.chars().take(200).collect::<String>()
                )));
            }
            Err(err) => return Err(FeedError::transport(err.to_string())),
        };
        response
            .into_json::<Value>()
            .map_err(|err| FeedError::malformed(format!("response body is not JSON: {err}")))
    }
}

/// A list request against one API resource, minus paging and the key.
#[derive(Debug, Clone)]
pub struct Query {
    resource: String,
    params: Vec<(String, String)>,
}

impl Query {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Comma-joined id list; the comma ends up encoded as `%2C`.
    pub fn ids(self, key: impl Into<String>, ids: &[String]) -> Self {
        self.param(key, ids.join(","))
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn url(&self, config: &FeedConfig, page_token: Option<&str>) -> String {
        let mut url = format!("{}/{}?", config.api_base, self.resource);
        let page = page_token.map(|token| ("pageToken", token));
        let pairs = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(page)
            .chain(std::iter::once(("key", config.api_key.as_str())));
        let encoded: Vec<String> = pairs
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
            .collect();
        url.push_str(&encoded.join("&"));
        url
    }
}

/// Strips the API key out of a URL before it goes anywhere near a log line.
pub fn redact(url: &str, api_key: &str) -> String {
    if api_key.is_empty() {
        return url.to_string();
    }
    url.replace(&*urlencoding::encode(api_key), "<redacted>")
}

/// One page of a list response.
#[derive(Debug, Deserialize)]
pub struct Page {
    pub items: Vec<Value>,
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

impl Page {
    /// Keeps only items whose `kind` equals `kind`.
    pub fn items_of_kind(self, kind: &str) -> impl Iterator<Item = Value> {
        let kind = kind.to_string();
        self.items
            .into_iter()
            .filter(move |item| item.get("kind").and_then(Value::as_str) == Some(kind.as_str()))
    }
}

pub fn decode<T: DeserializeOwned>(value: Value, what: &str) -> FeedResult<T> {
    serde_json::from_value(value).map_err(|err| FeedError::malformed(format!("{what}: {err}")))
}

/// Fetches a single page of `query`.
pub fn fetch_page(
    client: &dyn HttpClient,
    config: &FeedConfig,
    query: &Query,
    page_token: Option<&str>,
) -> FeedResult<Page> {
    let url = query.url(config, page_token);
    debug!(url = %redact(&url, &config.api_key), "GET");
    let body = client.get_json(&url)?;
    decode(body, &format!("{} page", query.resource()))
}

/// Follows `nextPageToken` until a page comes back without one and returns
/// every item of the requested `kind`, in page order.
pub fn execute(
    client: &dyn HttpClient,
    config: &FeedConfig,
    query: &Query,
    kind: &str,
) -> FeedResult<Vec<Value>> {
    let mut items = Vec::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;
    loop {
        let mut page = fetch_page(client, config, query, token.as_deref())?;
        pages += 1;
        let next = page.next_page_token.take();
        items.extend(page.items_of_kind(kind));
        match next {
            Some(next) => token = Some(next),
            None => break,
        }
    }
    debug!(resource = query.resource(), pages, items = items.len(), "pagination finished");
    Ok(items)
}
