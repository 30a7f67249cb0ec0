//! Site-Crawler: a same-domain web crawler
//!
//! This crate crawls a website starting from a seed URL, follows hyperlinks
//! that stay on the seed's network location, optionally saves every fetched
//! page to disk, and reports progress line by line to an observer.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for Site-Crawler operations
///
/// Per-page failures never surface here; they are reported through the
/// observer and the crawl report. Only setup problems (bad configuration,
/// bad seed, HTTP client construction) are returned as errors.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator, StopSignal};
pub use output::{CrawlObserver, CrawlReport};
pub use state::{CrawlSession, PageState};
pub use url::{is_in_scope, network_location, normalize_url};
