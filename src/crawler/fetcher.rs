//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTPS-only and plain-HTTP clients with a user agent string
//! - Falling back to plain HTTP once when the HTTPS-only client rejects a scheme,
//!   including a redirect from HTTPS to plain HTTP
//! - Retrying transient network failures a bounded number of times
//! - Handing fetched bodies to the link extractor
//!
//! Callers only ever see a list of links: every failure collapses to an empty
//! list, after being logged with the failing URL.

use crate::config::{Config, UserAgentConfig};
use crate::crawler::extractor::extract_links;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Source of outbound links for a URL
///
/// This is the crawler's only view of the network. Implementations must
/// not fail: a page that cannot be fetched yields no links.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches `url` and returns the candidate links it contains
    async fn fetch_links(&self, url: &str) -> Vec<String>;
}

/// Result of a single fetch attempt
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, DNS, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Worth retrying (timeouts and connection failures)
        transient: bool,
    },

    /// The client refused the URL's scheme before sending anything
    SchemeRejected {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    fn is_transient(&self) -> bool {
        matches!(self, Self::NetworkError { transient: true, .. })
    }
}

/// Builds an HTTP client with proper configuration
///
/// The secure client refuses anything but HTTPS; the other one also accepts
/// plain HTTP and is only used as a fallback.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total request timeout
/// * `https_only` - Whether plain HTTP URLs are rejected
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_fanout::config::UserAgentConfig;
/// use sumi_fanout::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30), true).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
    https_only: bool,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .https_only(https_only)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends one GET request and classifies the outcome
///
/// # Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | Success |
/// | Any other status | HttpError |
/// | Plain HTTP on an HTTPS-only client | SchemeRejected |
/// | Redirect to plain HTTP on an HTTPS-only client | SchemeRejected |
/// | Timeout or connection failure | NetworkError, transient |
/// | Anything else | NetworkError, not transient |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                    transient: e.is_timeout(),
                },
            }
        }
        Err(e) => {
            if scheme_rejected(e.is_builder(), e.is_redirect(), url, e.url()) {
                FetchResult::SchemeRejected {
                    error: e.to_string(),
                }
            } else if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                    transient: true,
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: format!("Connection failed: {}", e),
                    transient: true,
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                    transient: false,
                }
            }
        }
    }
}

/// True when an HTTPS-only client refused plain HTTP, either for the
/// requested URL or for a redirect target
fn scheme_rejected(builder: bool, redirect: bool, requested: &str, target: Option<&Url>) -> bool {
    if builder {
        return is_plain_http(requested);
    }
    redirect && target.map_or(false, |target| target.scheme() == "http")
}

fn is_plain_http(url: &str) -> bool {
    Url::parse(url)
        .map(|parsed| parsed.scheme() == "http")
        .unwrap_or(false)
}

/// Network-backed page source
pub struct HttpFetcher {
    secure: Client,
    insecure: Client,
    excluded_extensions: Vec<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Builds both clients from the crawler configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        Ok(Self {
            secure: build_http_client(&config.user_agent, timeout, true)?,
            insecure: build_http_client(&config.user_agent, timeout, false)?,
            excluded_extensions: config.extractor.excluded_extensions.clone(),
            max_retries: config.crawler.max_retries,
            retry_delay: Duration::from_millis(config.crawler.retry_delay_ms),
        })
    }

    /// Fetches `url`, falling back to plain HTTP once and retrying transient failures
    pub async fn fetch(&self, url: &str) -> FetchResult {
        let mut attempt = 0;
        loop {
            let mut result = fetch_url(&self.secure, url).await;

            if let FetchResult::SchemeRejected { error } = &result {
                tracing::debug!("{} rejected by HTTPS client ({}), retrying over HTTP", url, error);
                result = fetch_url(&self.insecure, url).await;
            }

            if result.is_transient() && attempt < self.max_retries {
                attempt += 1;
                tracing::debug!(
                    "Transient failure for {}, retry {}/{}",
                    url,
                    attempt,
                    self.max_retries
                );
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            return result;
        }
    }
}

#[async_trait]
impl PageSource for HttpFetcher {
    async fn fetch_links(&self, url: &str) -> Vec<String> {
        match self.fetch(url).await {
            FetchResult::Success { body, .. } => extract_links(&body, &self.excluded_extensions),
            FetchResult::HttpError { status_code } => {
                tracing::debug!("****ERROR fetching from site ({}): HTTP {}", url, status_code);
                Vec::new()
            }
            FetchResult::NetworkError { error, .. } | FetchResult::SchemeRejected { error } => {
                tracing::debug!("****ERROR fetching from site ({}): {}", url, error);
                Vec::new()
            }
        }
    }
}
