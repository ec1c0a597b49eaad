//! Page fetching
//!
//! This module defines the [`Fetcher`] seam the crawl workers call, and the
//! HTTP implementation used by the binary:
//! - Building an HTTP client with the configured user agent and timeout
//! - GET requests for page content
//! - Status classification into [`FetchError`]
//! - Raw href extraction from the returned HTML

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::extract_hrefs;
use crate::{CartographerError, FetchError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Turns a page URL into the raw hrefs found on that page
///
/// Implementations must be shareable between workers. Any error is treated by
/// the crawl as "no outbound links" for that page.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<String>, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Total time allowed for one request, body included
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (TLS backend or resolver
///   could not be initialized)
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP(S) and extracts `<a href>` values
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client described by the configuration
    ///
    /// # Errors
    ///
    /// `ResourceExhaustion` if the client (and its connection pool) cannot
    /// be created. This happens before any page is crawled.
    pub fn from_config(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, CartographerError> {
        let timeout = Duration::from_millis(crawler.fetch_timeout_ms);
        let client = build_http_client(user_agent, timeout).map_err(|e| {
            CartographerError::ResourceExhaustion(format!("failed to build HTTP client: {}", e))
        })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<String>, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    message: e.to_string(),
                }
            }
        })?;

        tracing::info!("Fetched {}", url);
        Ok(extract_hrefs(&body))
    }
}

fn classify_transport_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            source: error,
        }
    }
}
