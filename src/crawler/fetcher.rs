//! Timed HTTP fetcher
//!
//! This module performs the downloads the crawl measures, including:
//! - Building the HTTP client with explicit timeouts
//! - Sending one GET per call with a rotated browser User-Agent
//! - Timing the request from send until the whole body is in memory
//! - Error classification

use crate::config::{Config, CrawlerConfig};
use crate::crawler::user_agent::{RandomUserAgent, UserAgentSource};
use crate::FetchError;
use reqwest::{header::USER_AGENT, redirect::Policy, Client};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Maximum number of redirects followed for a single download
pub const MAX_REDIRECTS: usize = 10;

/// A completed, timed download
#[derive(Debug, Clone)]
pub struct FetchRecord {
    /// The URL that was requested
    pub url: String,

    /// Time from sending the request until the body was fully read
    pub elapsed: Duration,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchRecord {
    /// Returns the download time in seconds
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Builds an HTTP client with the crawl's timeouts
///
/// Redirects are followed, so a redirected resource is timed including its
/// redirect hops, the way a browser experiences it. No cookie store is kept
/// and no User-Agent is set here; it is chosen per request.
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues timed GET requests
#[derive(Clone)]
pub struct FetchTimer {
    client: Client,
    user_agents: Arc<dyn UserAgentSource>,
}

impl FetchTimer {
    /// Creates a fetcher from a client and a User-Agent source
    pub fn new(client: Client, user_agents: Arc<dyn UserAgentSource>) -> Self {
        Self {
            client,
            user_agents,
        }
    }

    /// Creates a fetcher with the configured timeouts and User-Agent pool
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(&config.crawler)?;
        let user_agents = Arc::new(RandomUserAgent::from_config(&config.user_agent));
        Ok(Self::new(client, user_agents))
    }

    /// Downloads `url` once and measures how long it took
    ///
    /// # Error Classification
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Timeout (connect or whole request) | `FetchError::Timeout` |
    /// | DNS, connection, TLS, redirect limit | `FetchError::Request` |
    /// | Non-2xx final status | `FetchError::Status` |
    /// | Body read failure | `FetchError::Body` |
    ///
    /// No retries are attempted.
    pub async fn fetch(&self, url: &str) -> Result<FetchRecord, FetchError> {
        let user_agent = self.user_agents.next_user_agent();

        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let elapsed = started.elapsed();

        tracing::trace!(
            "Fetched {} ({} bytes) in {:.3}s",
            url,
            body.len(),
            elapsed.as_secs_f64()
        );

        Ok(FetchRecord {
            url: url.to_string(),
            elapsed,
            body: body.to_vec(),
        })
    }
}

/// Maps a send failure onto a `FetchError`
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Request {
            url: url.to_string(),
            source: error,
        }
    }
}
