//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with a fixed user agent and request timeout
//! - GET requests to fetch page content
//! - Classifying responses as usable, skipped, or failed
//!
//! There are no retries. Redirects are followed by the client (up to
//! 10 hops) and the final URL is reported back.

use crate::config::FetcherConfig;
use crate::state::PageState;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, StatusCode};
use std::fmt;
use url::Url;

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum PageResult {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code (always 200)
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Page is reachable but intentionally not processed
    Skipped {
        reason: SkipReason,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        kind: TransportErrorKind,
        error: String,
    },
}

/// Why a reachable page was not processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Any status other than exactly 200
    Status(u16),
    /// Content-Type does not contain `text/html`
    ContentType(String),
}

impl SkipReason {
    /// Maps the skip reason to the page state recorded for it
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Status(404) | Self::Status(410) => PageState::DeadLink,
            Self::Status(_) => PageState::HttpError,
            Self::ContentType(_) => PageState::ContentMismatch,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::ContentType(ct) if ct.is_empty() => write!(f, "content type <missing>"),
            Self::ContentType(ct) => write!(f, "content type {}", ct),
        }
    }
}

/// Coarse classification of transport failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    /// DNS failure, connection refused, TLS handshake failure
    Connect,
    /// Redirect loop or too many redirects
    Redirect,
    /// Failure while reading or decoding the body
    Body,
    Other,
}

impl TransportErrorKind {
    fn from_error(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect
        } else if e.is_redirect() {
            Self::Redirect
        } else if e.is_body() || e.is_decode() {
            Self::Body
        } else {
            Self::Other
        }
    }

    /// Maps the error kind to the page state recorded for it
    pub fn page_state(&self) -> PageState {
        match self {
            Self::Timeout => PageState::TimedOut,
            Self::Connect => PageState::Unreachable,
            Self::Redirect | Self::Body | Self::Other => PageState::Failed,
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::FetcherConfig;
/// use site_crawler::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Decides whether a response is usable
///
/// Usable means status exactly 200 and a Content-Type containing
/// `text/html` (compared case-insensitively).
pub fn classify_response(status: StatusCode, content_type: &str) -> Result<(), SkipReason> {
    if status != StatusCode::OK {
        return Err(SkipReason::Status(status.as_u16()));
    }

    if !content_type.to_ascii_lowercase().contains("text/html") {
        return Err(SkipReason::ContentType(content_type.to_string()));
    }

    Ok(())
}

/// Issues GET requests for the crawler
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Fetches a URL and classifies the outcome
    pub async fn fetch(&self, url: &Url) -> PageResult {
        let response = match self.client.get(url.as_str()).send().await {
            Ok(response) => response,
            Err(e) => {
                return PageResult::NetworkError {
                    kind: TransportErrorKind::from_error(&e),
                    error: e.to_string(),
                }
            }
        };

        let status = response.status();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if let Err(reason) = classify_response(status, &content_type) {
            return PageResult::Skipped { reason };
        }

        match response.text().await {
            Ok(body) => PageResult::Success {
                final_url,
                status_code: status.as_u16(),
                content_type,
                body,
            },
            Err(e) => PageResult::NetworkError {
                kind: if e.is_timeout() {
                    TransportErrorKind::Timeout
                } else {
                    TransportErrorKind::Body
                },
                error: e.to_string(),
            },
        }
    }
}
