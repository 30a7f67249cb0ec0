use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Browser-like identification sent with every request
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; site-crawler/0.1)";

/// Main configuration structure for Site-Crawler
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to fetch successfully
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Maximum number of fetches in flight at once
    pub concurrency: usize,

    /// Whether fetched pages are written to the pages directory
    #[serde(rename = "save-content")]
    pub save_content: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            concurrency: 1,
            save_content: false,
        }
    }
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Total request timeout (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl FetcherConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 10_000,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that saved pages are written into
    #[serde(rename = "pages-dir")]
    pub pages_dir: String,

    /// Path to the markdown summary file (empty disables it)
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}

impl OutputConfig {
    /// Returns the markdown summary path, if one is configured
    pub fn summary_path(&self) -> Option<PathBuf> {
        if self.summary_path.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(&self.summary_path))
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pages_dir: "pages".to_string(),
            summary_path: String::new(),
        }
    }
}
