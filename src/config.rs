use crate::error::{FeedError, FeedResult};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const API_KEY_ENV: &str = "YOUTUBE_SERVER_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_WATCH_BASE: &str = "https://youtube.com";
pub const FEED_TEMPLATE: &str = "feedtemplate.xml";
pub const UPDATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Platform ceiling for `maxResults` and bulk id lookups.
pub const MAX_RESULTS: usize = 50;
pub const PLAYLIST_DEPTH: usize = 5;
pub const MAX_DESCRIPTION_LENGTH: usize = 800;

/// Values read from an optional `KEY="value"` config file.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub watch_base: Option<String>,
}

/// Everything the pipeline needs for one run. Threaded explicitly through
/// every stage so tests can build one by hand.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub api_base: String,
    pub api_key: String,
    pub watch_base: String,
    pub template_name: String,
    pub max_results: usize,
    pub playlist_depth: usize,
    pub max_feed_size: usize,
    pub max_description_length: usize,
}

impl FeedConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: api_key.into(),
            watch_base: DEFAULT_WATCH_BASE.to_string(),
            template_name: FEED_TEMPLATE.to_string(),
            max_results: MAX_RESULTS,
            playlist_depth: PLAYLIST_DEPTH,
            max_feed_size: MAX_RESULTS,
            max_description_length: MAX_DESCRIPTION_LENGTH,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_watch_base(mut self, watch_base: impl Into<String>) -> Self {
        self.watch_base = watch_base.into().trim_end_matches('/').to_string();
        self
    }
}

pub fn read_env_config(path: &Path) -> FeedResult<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            let value = value_raw.trim().trim_matches('"');
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                API_KEY_ENV => cfg.api_key = Some(value.to_string()),
                "API_BASE_URL" => cfg.api_base = Some(value.to_string()),
                "WATCH_BASE_URL" => cfg.watch_base = Some(value.to_string()),
                _ => {}
            }
        }
    }
    Ok(Some(cfg))
}

/// The key may be given literally or as the path of a file holding it.
pub fn resolve_api_key(raw: &str) -> FeedResult<String> {
    let candidate = PathBuf::from(raw);
    let key = if candidate.is_file() {
        fs::read_to_string(&candidate)?.trim().to_string()
    } else {
        raw.trim().to_string()
    };
    if key.is_empty() {
        return Err(FeedError::configuration(format!(
            "{API_KEY_ENV} resolved to an empty key"
        )));
    }
    Ok(key)
}

pub fn load_feed_config(config_path: Option<&Path>) -> FeedResult<FeedConfig> {
    load_feed_config_with(config_path, env::var(API_KEY_ENV).ok())
}

/// Builds the run configuration. An explicit `config_path` must exist; the
/// environment key (if any) wins over the file's.
pub fn load_feed_config_with(
    config_path: Option<&Path>,
    env_key: Option<String>,
) -> FeedResult<FeedConfig> {
    let file_cfg = match config_path {
        Some(path) => read_env_config(path)?.ok_or_else(|| {
            FeedError::configuration(format!("Missing config file at {}", path.display()))
        })?,
        None => EnvConfig::default(),
    };

    let raw_key = env_key
        .filter(|value| !value.trim().is_empty())
        .or(file_cfg.api_key)
        .ok_or_else(|| FeedError::configuration(format!("Failed to load {API_KEY_ENV}")))?;

    let mut config = FeedConfig::new(resolve_api_key(&raw_key)?);
    if let Some(api_base) = file_cfg.api_base {
        config = config.with_api_base(api_base);
    }
    if let Some(watch_base) = file_cfg.watch_base {
        config = config.with_watch_base(watch_base);
    }
    Ok(config)
}
