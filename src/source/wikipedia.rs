//! Wikipedia "on this day" feed source.
//!
//! Requests `{endpoint}/feed/onthisday/all/{MM}/{DD}` from the Wikimedia REST
//! API. Wikimedia asks API clients to identify themselves, so every request
//! carries an `Api-User-Agent` header.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::FeedSource;
use crate::date::FeedDate;
use crate::error::{FeedError, FetchResult};

pub const DEFAULT_ENDPOINT: &str = "https://en.wikipedia.org/api/rest_v1";
/// Wikimedia's user agent policy asks for a way to reach the operator;
/// override with `--user-agent` to put your own contact here.
pub const DEFAULT_USER_AGENT: &str = concat!(
    "onthisday/",
    env!("CARGO_PKG_VERSION"),
    " (onthisday@example.org)"
);

const API_USER_AGENT: HeaderName = HeaderName::from_static("api-user-agent");

/// The Wikipedia REST feed for one language edition.
pub struct WikipediaSource {
    endpoint: String,
    client: Client,
}

impl WikipediaSource {
    /// Create a new source.
    ///
    /// # Arguments
    ///
    /// * `endpoint` — REST API root, e.g. `https://en.wikipedia.org/api/rest_v1`.
    /// * `user_agent` — value of the `Api-User-Agent` header.
    pub fn new(endpoint: impl Into<String>, user_agent: &str) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(API_USER_AGENT, HeaderValue::from_str(user_agent)?);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Full request URL for `date`.
    pub fn url_for(&self, date: &FeedDate) -> String {
        format!(
            "{}/feed/onthisday/all/{}/{}",
            self.endpoint, date.month, date.day
        )
    }
}

#[async_trait]
impl FeedSource for WikipediaSource {
    fn name(&self) -> &str {
        "wikipedia"
    }

    async fn fetch(&self, date: &FeedDate) -> FetchResult<Value> {
        let url = self.url_for(date);
        debug!(%url, "requesting feed");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
