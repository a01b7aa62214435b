#![forbid(unsafe_code)]

//! Writes an Atom feed of recent uploads from a user's subscriptions.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};
use ytsubs_feed::api::UreqClient;
use ytsubs_feed::config::load_feed_config;
use ytsubs_feed::pipeline;
use ytsubs_feed::render::AtomRenderer;

#[derive(Parser, Debug)]
#[command(author, version, about = "Build an Atom feed from a YouTube user's subscriptions.")]
struct Cli {
    /// YouTube username whose subscriptions are aggregated
    #[arg(value_name = "USERNAME")]
    username: String,
    /// Where the rendered feed is written
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
    #[arg(
        long = "config",
        value_name = "PATH",
        help = "Env-style file with YOUTUBE_SERVER_API_KEY / API_BASE_URL / WATCH_BASE_URL"
    )]
    config: Option<PathBuf>,
    #[arg(
        long = "log-level",
        default_value = "info",
        help = "Log filter (error, warn, info, debug, trace)"
    )]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_feed_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "failed to load configuration");
            return Err(err).context("loading configuration");
        }
    };
    info!(user = %cli.username, output = %cli.output.display(), "building feed");

    let client = UreqClient::new();
    let document = pipeline::run(&client, &config, &cli.username, Local::now())
        .with_context(|| format!("building feed for {}", cli.username))?;
    pipeline::write_feed(&AtomRenderer, &config, &document, &cli.output)
        .with_context(|| format!("writing feed to {}", cli.output.display()))?;

    info!(entries = document.entries.len(), "done");
    Ok(())
}
