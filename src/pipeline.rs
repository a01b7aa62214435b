//! End-to-end run: username in, rendered feed out.
//!
//! Every stage finishes before the next one starts and the first error
//! aborts the run, so a failed run never produces a partial feed.

use crate::api::HttpClient;
use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::feed::{self, FeedDocument, FeedEntry};
use crate::render::Renderer;
use crate::{subscriptions, uploads, videos};
use chrono::{DateTime, TimeZone};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::info;

/// Fetches and assembles the entry list for `username`.
pub fn collect_entries(
    client: &dyn HttpClient,
    config: &FeedConfig,
    username: &str,
) -> FeedResult<Vec<FeedEntry>> {
    let channel = subscriptions::channel_for_user(client, config, username)?;
    let playlists = subscriptions::resolve_upload_playlists(client, config, &channel)?;
    let video_ids = uploads::recent_uploads(client, config, &playlists)?;
    info!(playlists = playlists.len(), videos = video_ids.len(), "collected recent uploads");
    let details = videos::fetch_details(client, config, &video_ids)?;
    let entries = feed::assemble(config, details)?;
    info!(entries = entries.len(), "assembled feed");
    Ok(entries)
}

pub fn run<Tz>(
    client: &dyn HttpClient,
    config: &FeedConfig,
    username: &str,
    generated: DateTime<Tz>,
) -> FeedResult<FeedDocument>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let entries = collect_entries(client, config, username)?;
    Ok(FeedDocument::new(username, generated, entries))
}

/// Renders `document` and replaces `destination` atomically.
pub fn write_feed(
    renderer: &dyn Renderer,
    config: &FeedConfig,
    document: &FeedDocument,
    destination: &Path,
) -> FeedResult<()> {
    let bytes = renderer.render(&config.template_name, document)?;
    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(&bytes)?;
    tmp.flush()?;
    tmp.persist(destination)
        .map_err(|err| FeedError::Io(err.error))?;
    info!(path = %destination.display(), bytes = bytes.len(), "wrote feed");
    Ok(())
}
