#![forbid(unsafe_code)]

//! Builds an Atom feed of the latest uploads from every channel a YouTube
//! user subscribes to.
//!
//! The stages live in their own modules and all take the HTTP client and the
//! run configuration explicitly; [`pipeline`] strings them together.

pub mod api;
pub mod config;
pub mod duration;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod render;
pub mod sanitize;
pub mod subscriptions;
pub mod uploads;
pub mod videos;

pub use error::{FeedError, FeedResult};
