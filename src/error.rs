//! Error types.
//!
//! Fetch failures are typed so they can be logged with full detail, but the
//! UI only ever sees the collapsed "feed unavailable" outcome produced by
//! [`crate::source::fetch_feed`].

use reqwest::StatusCode;
use thiserror::Error;

/// Why a single feed request failed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server answered with status {0}")]
    Status(StatusCode),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid request header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// A typed date that could not be turned into a calendar day.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateInputError {
    #[error("expected a date as YYYY-MM-DD, got {0:?}")]
    Malformed(String),
}

/// Startup configuration that cannot be resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no cache directory on this system; pass --log-dir")]
    NoCacheDir,
}

pub type FetchResult<T> = Result<T, FeedError>;
