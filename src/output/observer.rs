//! Progress observer interface
//!
//! The crawler knows nothing about who consumes its progress lines; it only
//! calls `on_log` on whatever observer it was given.

/// Receives human-readable progress and error lines during a crawl
///
/// When fetches run concurrently, lines from different pages may arrive
/// interleaved.
pub trait CrawlObserver: Send + Sync {
    fn on_log(&self, line: &str);
}

impl<F> CrawlObserver for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_log(&self, line: &str) {
        self(line)
    }
}

/// Forwards every line to the `tracing` subscriber at info level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn on_log(&self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// Discards every line
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl CrawlObserver for NullObserver {
    fn on_log(&self, _line: &str) {}
}
