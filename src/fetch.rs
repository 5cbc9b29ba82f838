//! Background feed fetching.
//!
//! Every date selection becomes one [`FetchRequest`]. [`Fetcher::spawn`]
//! runs it on the tokio runtime and sends the outcome back to the UI loop
//! over an unbounded channel, which the loop drains on every tick.
//!
//! ## For contributors
//!
//! There is no cancellation and no timeout: a request runs until the source
//! answers or fails. Out-of-order completions are not filtered here; the
//! token on each [`FetchMsg`] lets [`crate::app::App`] drop stale ones.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::date::format_for_feed;
use crate::source::{fetch_feed, FeedSource, Fetched};

/// One request for the feed of `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Sequence number, increasing with every date selection.
    pub token: u64,
    pub date: NaiveDate,
}

/// Sent from a fetch task to the UI loop when a request finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMsg {
    pub token: u64,
    pub date: NaiveDate,
    pub fetched: Fetched,
}

/// Spawns fetch tasks against one source.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn FeedSource>,
    tx: mpsc::UnboundedSender<FetchMsg>,
}

/// Create a fetcher and the receiver the main loop should drain.
pub fn channel(source: Arc<dyn FeedSource>) -> (Fetcher, mpsc::UnboundedReceiver<FetchMsg>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Fetcher { source, tx }, rx)
}

impl Fetcher {
    /// Start fetching in the background. Must be called within a tokio
    /// runtime.
    pub fn spawn(&self, request: FetchRequest) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let params = format_for_feed(request.date);
            let fetched = fetch_feed(source.as_ref(), &params).await;
            let msg = FetchMsg {
                token: request.token,
                date: request.date,
                fetched,
            };
            // The receiver is gone once the UI loop has exited.
            if tx.send(msg).is_err() {
                debug!(token = request.token, "ui gone, dropping fetch result");
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
