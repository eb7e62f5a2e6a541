//! RSS feed retrieval over HTTP.

use crate::feeds::{FeedError, FeedSource, rss};
use crate::models::FeedEntry;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument};
use url::Url;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A feed fetched with a single GET per call.
#[derive(Debug, Clone)]
pub struct HttpFeed {
    url: Url,
    client: Client,
}

impl HttpFeed {
    /// Build a feed source whose requests give up after `timeout`.
    pub fn new(url: Url, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| FeedError::Http {
                url: url.to_string(),
                source,
            })?;
        Ok(Self { url, client })
    }
}

impl FeedSource for HttpFeed {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    #[instrument(level = "info", skip_all, fields(url = %self.url))]
    async fn entries(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let http_err = |source| FeedError::Http {
            url: self.url.to_string(),
            source,
        };

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(http_err)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: self.url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(http_err)?;
        debug!(bytes = body.len(), %status, "Downloaded feed");

        let entries = rss::parse_feed(&body)?;
        info!(count = entries.len(), "Fetched feed entries");
        Ok(entries)
    }
}
