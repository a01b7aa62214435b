//! Turns fetched videos into the ordered, bounded entry list handed to the
//! renderer.

use crate::config::{FeedConfig, UPDATE_TIME_FORMAT};
use crate::duration;
use crate::error::FeedResult;
use crate::sanitize::{sanitize_description, sanitize_title_or_author};
use crate::videos::VideoRecord;
use chrono::{DateTime, TimeZone};

/// One rendered item. Text fields are already escaped for markup.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub id: String,
    pub title: String,
    pub link: String,
    pub author: String,
    pub pub_date: String,
    pub description: String,
    pub thumbnail: String,
    pub duration: String,
}

/// Entries plus run metadata.
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub user: String,
    pub update_time: String,
    pub entries: Vec<FeedEntry>,
}

impl FeedDocument {
    pub fn new<Tz>(user: impl Into<String>, generated: DateTime<Tz>, entries: Vec<FeedEntry>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            user: user.into(),
            update_time: generated.format(UPDATE_TIME_FORMAT).to_string(),
            entries,
        }
    }
}

pub fn watch_link(config: &FeedConfig, video_id: &str) -> String {
    format!("{}/watch?v={}", config.watch_base, video_id)
}

pub fn to_entry(config: &FeedConfig, video: &VideoRecord) -> FeedResult<FeedEntry> {
    Ok(FeedEntry {
        id: video.id.clone(),
        title: sanitize_title_or_author(&video.title),
        link: watch_link(config, &video.id),
        author: sanitize_title_or_author(&video.channel_title),
        pub_date: video.published_raw.clone(),
        description: sanitize_description(&video.description, config.max_description_length),
        thumbnail: video.thumbnail_url.clone(),
        duration: duration::normalize(&video.duration_raw)?,
    })
}

/// Newest first (stable for equal timestamps), cut to `max_feed_size`.
/// Nothing is dropped except by the size bound; duplicates are kept.
pub fn assemble(config: &FeedConfig, mut videos: Vec<VideoRecord>) -> FeedResult<Vec<FeedEntry>> {
    videos.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    videos.truncate(config.max_feed_size);
    videos.iter().map(|video| to_entry(config, video)).collect()
}
