//! Feed source abstraction layer.
//!
//! This module defines the [`FeedSource`] trait, the normalized feed types
//! (see [`feed`]) and [`fetch_feed`], the boundary that turns every kind of
//! request failure into an empty feed plus a failure flag.
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `mirror.rs`).
//! 2. Define a struct and implement [`FeedSource`] for it; `fetch` returns
//!    the raw decoded JSON body.
//! 3. Add `mod mirror;` below and re-export your struct.
//! 4. Construct it in `main.rs` instead of [`WikipediaSource`].
//!
//! Normalization, error swallowing and the UI do not care where the JSON
//! came from.

pub mod feed;
#[cfg(test)]
pub mod stub;
mod wikipedia;

pub use feed::{normalize, Category, Entry, FeedResult};
pub use wikipedia::{WikipediaSource, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::date::FeedDate;
use crate::error::FetchResult;

/// Anything that can answer an "on this day" request.
///
/// One fetch task is spawned per date selection, so implementations must be
/// [`Send`] + [`Sync`] to live behind an `Arc`.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Perform one request for `date` and return the decoded body.
    async fn fetch(&self, date: &FeedDate) -> FetchResult<Value>;
}

/// What one fetch cycle produced.
///
/// `failed` is the only failure signal the caller gets; the feed is then
/// [`FeedResult::empty`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub feed: FeedResult,
    pub failed: bool,
}

impl Fetched {
    pub fn ok(feed: FeedResult) -> Self {
        Self { feed, failed: false }
    }

    pub fn unavailable() -> Self {
        Self {
            feed: FeedResult::empty(),
            failed: true,
        }
    }
}

/// Fetch and normalize the feed for `date`. Never returns an error.
pub async fn fetch_feed(source: &dyn FeedSource, date: &FeedDate) -> Fetched {
    match source.fetch(date).await {
        Ok(raw) => {
            let feed = normalize(&raw);
            info!(
                source = source.name(),
                month = %date.month,
                day = %date.day,
                births = feed.births.len(),
                deaths = feed.deaths.len(),
                events = feed.events.len(),
                "feed loaded"
            );
            Fetched::ok(feed)
        }
        Err(e) => {
            warn!(
                source = source.name(),
                month = %date.month,
                day = %date.day,
                error = %e,
                "feed unavailable"
            );
            Fetched::unavailable()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
