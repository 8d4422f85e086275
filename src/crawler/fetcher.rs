//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during an audit:
//! - Building the HTTP client (redirects, compression, TLS)
//! - GET requests under an exact, caller-chosen `User-Agent`
//! - A hard wall-clock timeout around the whole request
//! - Error classification into a status-0 failure
//!
//! There are no retries: one failed fetch is final for that unit of work.

use crate::config::FetcherConfig;
use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// `Accept` header sent with every request
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// A response received from the server (any status)
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code of the final response
    pub status_code: u16,
    /// Response headers of the final response
    pub headers: HeaderMap,
    /// Body text; empty unless the status is 2xx
    pub body: String,
    /// Final URL after redirects
    pub final_url: String,
}

impl FetchedPage {
    /// Returns true for a 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Returns true for 404 Not Found and 410 Gone
    pub fn is_absent(&self) -> bool {
        self.status_code == 404 || self.status_code == 410
    }
}

/// Classification of a failed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The wall-clock timeout elapsed
    Timeout,
    /// Connection refused, DNS failure, TLS failure
    Connect,
    /// Redirect limit or loop
    Redirect,
    /// Anything else (body decode, protocol error)
    Other,
}

/// A fetch that produced no usable response
#[derive(Debug, Clone)]
pub struct FetchFailure {
    /// The URL that was requested
    pub url: String,
    /// Failure class
    pub kind: FailureKind,
    /// Error description
    pub error: String,
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// The server answered (possibly with an error status)
    Response(FetchedPage),
    /// Network error or timeout; reported as status 0
    Failure(FetchFailure),
}

impl FetchResult {
    /// HTTP status code, or 0 when the target was unreachable
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Response(page) => page.status_code,
            Self::Failure(_) => 0,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client carries no default user agent: every request sets its own.
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(config.timeout())
        .connect_timeout(config.timeout())
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages under simulated crawler identities
#[derive(Debug, Clone)]
pub struct AgentFetcher {
    client: Client,
    timeout: Duration,
}

impl AgentFetcher {
    /// Creates a fetcher from configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            timeout: config.timeout(),
        })
    }

    /// Fetches `url` with the `User-Agent` header set exactly to `user_agent`
    ///
    /// Redirects are followed transparently. Never returns an error: timeouts
    /// and network failures come back as [`FetchResult::Failure`].
    pub async fn fetch(&self, url: &str, user_agent: &str) -> FetchResult {
        let started = std::time::Instant::now();

        let result = tokio::time::timeout(self.timeout, self.fetch_inner(url, user_agent)).await;

        let outcome = match result {
            Ok(Ok(page)) => FetchResult::Response(page),
            Ok(Err(e)) => FetchResult::Failure(classify_error(url, &e)),
            Err(_) => FetchResult::Failure(FetchFailure {
                url: url.to_string(),
                kind: FailureKind::Timeout,
                error: format!("Request timeout after {}s", self.timeout.as_secs()),
            }),
        };

        tracing::debug!(
            "GET {} as {:?} -> {} in {:?}",
            url,
            user_agent,
            outcome.status_code(),
            started.elapsed()
        );

        outcome
    }

    async fn fetch_inner(&self, url: &str, user_agent: &str) -> Result<FetchedPage, reqwest::Error> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .header(ACCEPT, ACCEPT_HTML)
            .send()
            .await?;

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = response.headers().clone();

        let body = if response.status().is_success() {
            response.text().await?
        } else {
            String::new()
        };

        Ok(FetchedPage {
            status_code,
            headers,
            body,
            final_url,
        })
    }
}

/// Classifies a reqwest error into a failure
fn classify_error(url: &str, e: &reqwest::Error) -> FetchFailure {
    let (kind, error) = if e.is_timeout() {
        (FailureKind::Timeout, "Request timeout".to_string())
    } else if e.is_connect() {
        (FailureKind::Connect, format!("Connection failed: {}", e))
    } else if e.is_redirect() {
        (FailureKind::Redirect, format!("Redirect error: {}", e))
    } else {
        (FailureKind::Other, e.to_string())
    };

    FetchFailure {
        url: url.to_string(),
        kind,
        error,
    }
}
