//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent string
//! - GET requests to fetch page content
//! - Enforcing the 200 OK contract
//! - Capping how much of a response body is read

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::KensakuError;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings (request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use kensaku::config::{CrawlerConfig, UserAgentConfig};
/// use kensaku::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP, reading at most `max_body_size` bytes of each body
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_body_size: usize,
}

impl Fetcher {
    pub fn new(client: Client, max_body_size: usize) -> Self {
        Self {
            client,
            max_body_size,
        }
    }

    /// Builds a fetcher from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        crawler: &CrawlerConfig,
    ) -> Result<Self, KensakuError> {
        let client = build_http_client(user_agent, crawler)?;
        Ok(Self::new(client, crawler.max_body_size))
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Fetches `url` and returns the (possibly truncated) body
    ///
    /// # Errors
    ///
    /// * `KensakuError::Http` - the request could not be sent or the body
    ///   could not be read
    /// * `KensakuError::UnreachableUrl` - the server answered with anything
    ///   other than 200 OK
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, KensakuError> {
        let mut response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|source| KensakuError::Http {
                    url: url.to_string(),
                    source,
                })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(KensakuError::UnreachableUrl {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut body = Vec::new();
        while body.len() < self.max_body_size {
            let chunk = response
                .chunk()
                .await
                .map_err(|source| KensakuError::Http {
                    url: url.to_string(),
                    source,
                })?;

            let Some(chunk) = chunk else {
                break;
            };

            let remaining = self.max_body_size - body.len();
            body.extend_from_slice(&chunk[..chunk.len().min(remaining)]);
        }

        Ok(body)
    }
}
