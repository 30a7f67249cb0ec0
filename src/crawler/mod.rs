//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and response classification
//! - HTML parsing and link extraction
//! - The depth-first work stack
//! - Overall crawl coordination and stop handling

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod signal;

pub use coordinator::Coordinator;
pub use fetcher::{
    build_http_client, classify_response, Fetcher, PageResult, SkipReason, TransportErrorKind,
};
pub use frontier::Frontier;
pub use parser::{parse_html, ParsedPage};
pub use signal::StopSignal;

use crate::config::Config;
use crate::output::{CrawlObserver, CrawlReport};
use crate::CrawlerError;
use std::sync::Arc;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a configured crawl. It will:
/// 1. Validate the seed and derive the crawl scope from it
/// 2. Build the HTTP client
/// 3. Fetch pages depth-first, following in-scope links
/// 4. Save pages when `save-content` is enabled
/// 5. Return the crawl report
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl ran to completion (or was stopped)
/// * `Err(CrawlerError)` - The crawl could not be started
pub async fn crawl(
    config: Config,
    seed_url: &str,
    observer: Arc<dyn CrawlObserver>,
) -> Result<CrawlReport, CrawlerError> {
    let coordinator = Coordinator::new(config, seed_url, observer)?;
    Ok(coordinator.run().await)
}

/// Crawls a site with default settings and returns the number of pages visited
///
/// `on_log` receives every progress and error line. An unusable seed is
/// reported through `on_log` and yields 0.
///
/// # Example
///
/// ```no_run
/// use site_crawler::run_crawl;
///
/// # async fn example() {
/// let pages = run_crawl("https://example.com/", false, 50, |line: &str| println!("{}", line)).await;
/// println!("Done. Links crawled: {}", pages);
/// # }
/// ```
pub async fn run_crawl<F>(seed_url: &str, save_content: bool, page_budget: usize, on_log: F) -> usize
where
    F: Fn(&str) + Send + Sync + 'static,
{
    let mut config = Config::default();
    config.crawler.max_pages = page_budget;
    config.crawler.save_content = save_content;

    let observer: Arc<dyn CrawlObserver> = Arc::new(on_log);
    match crawl(config, seed_url, observer.clone()).await {
        Ok(report) => report.pages_fetched,
        Err(e) => {
            observer.on_log(&format!("[Error] {} -> {}", seed_url, e));
            0
        }
    }
}
