//! Feed sources for retirement announcements.
//!
//! Every source yields [`FeedEntry`] values in feed order and nothing else;
//! timestamp parsing and date extraction happen downstream in
//! [`crate::pipeline`].
//!
//! # Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | HTTP | [`http`] | Fetches the RSS document with a bounded timeout |
//! | Local file | [`FileFeed`] | Reads a saved RSS document, for offline runs |
//!
//! [`retry::Retry`] wraps any source with exponential backoff for transient
//! failures.

pub mod http;
pub mod published;
pub mod retry;
pub mod rss;

use crate::models::FeedEntry;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::{info, instrument};

/// Errors raised while reading a feed or one of its entries.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read feed file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("feed is not a valid RSS document: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("unparseable publication timestamp {value:?}: {source}")]
    Timestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl FeedError {
    /// Whether retrying the same request could succeed.
    ///
    /// Transport errors, timeouts, HTTP 429 and 5xx responses are transient.
    /// Malformed documents and unreadable files are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FeedError::Http { .. } => true,
            FeedError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            FeedError::Io { .. } | FeedError::Xml(_) | FeedError::Timestamp { .. } => false,
        }
    }
}

/// A source of raw feed entries.
pub trait FeedSource {
    /// Human-readable origin, used in logs and the report.
    fn describe(&self) -> String;

    /// Read every entry currently in the feed.
    async fn entries(&self) -> Result<Vec<FeedEntry>, FeedError>;
}

/// A feed read from a saved RSS file.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FeedSource for FileFeed {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    #[instrument(level = "info", skip_all, fields(path = %self.path.display()))]
    async fn entries(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let xml = fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.path.clone(),
                source,
            })?;
        let entries = rss::parse_feed(&xml)?;
        info!(count = entries.len(), "Read feed file");
        Ok(entries)
    }
}
