//! Scripted [`FeedSource`] for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;

use super::FeedSource;
use crate::date::FeedDate;
use crate::error::FetchResult;

type Responder = Box<dyn Fn(&FeedDate) -> FetchResult<Value> + Send + Sync>;

/// Answers every request with whatever the responder closure returns and
/// counts the calls.
pub struct StubSource {
    responder: Responder,
    calls: AtomicUsize,
}

impl StubSource {
    pub fn new(responder: impl Fn(&FeedDate) -> FetchResult<Value> + Send + Sync + 'static) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedSource for StubSource {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch(&self, date: &FeedDate) -> FetchResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.responder)(date)
    }
}
