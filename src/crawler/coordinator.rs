//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates:
//! - Admission of URLs against the visited set and page budget
//! - Fetching, with up to `concurrency` requests in flight
//! - Optional persistence of fetched pages
//! - Link extraction and domain filtering
//! - Stop requests and final reporting
//!
//! The coordinator task is the only owner of the session and the frontier;
//! spawned tasks only perform the HTTP requests.

use crate::config::Config;
use crate::crawler::fetcher::{Fetcher, PageResult};
use crate::crawler::frontier::Frontier;
use crate::crawler::parser::parse_html;
use crate::crawler::signal::StopSignal;
use crate::output::{CrawlObserver, CrawlReport, SaveFailure};
use crate::state::{Admission, CrawlSession, PageState};
use crate::storage::{FilePageSink, PageSink};
use crate::url::normalize_url;
use crate::CrawlerError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    session: CrawlSession,
    frontier: Frontier,
    fetcher: Fetcher,
    sink: Option<Box<dyn PageSink>>,
    observer: Arc<dyn CrawlObserver>,
    stop: StopSignal,
    report: CrawlReport,
    /// Links popped while the same URL was being fetched, keyed by URL
    parked: HashMap<String, Vec<Url>>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration; `max-pages` is the page budget
    /// * `seed_url` - Where the crawl starts; its network location is the scope
    /// * `observer` - Receives progress and error lines
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(CrawlerError)` - The seed is not an HTTP(S) URL, or the HTTP
    ///   client could not be built
    pub fn new(
        config: Config,
        seed_url: &str,
        observer: Arc<dyn CrawlObserver>,
    ) -> Result<Self, CrawlerError> {
        let session = CrawlSession::new(seed_url, config.crawler.max_pages)?;
        let fetcher = Fetcher::new(&config.fetcher)?;

        let sink: Option<Box<dyn PageSink>> = if config.crawler.save_content {
            Some(Box::new(FilePageSink::new(&config.output.pages_dir)))
        } else {
            None
        };

        let frontier = Frontier::new(session.seed_url().clone());
        let report = CrawlReport::new(&session);

        Ok(Self {
            config: Arc::new(config),
            session,
            frontier,
            fetcher,
            sink,
            observer,
            stop: StopSignal::new(),
            report,
            parked: HashMap::new(),
        })
    }

    /// Replaces the persistence sink, enabling persistence
    pub fn with_sink(mut self, sink: Box<dyn PageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Uses an externally owned stop signal
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    /// Runs the crawl to completion
    ///
    /// Returns once the frontier is exhausted, the page budget is used up,
    /// or the stop signal is raised. Per-page failures are reported to the
    /// observer and recorded in the report; none of them end the crawl.
    pub async fn run(mut self) -> CrawlReport {
        let concurrency = self.config.crawler.concurrency.max(1);
        tracing::info!(
            "Starting crawl of {} (domain: {}, budget: {}, concurrency: {})",
            self.session.seed_url(),
            self.session.domain(),
            self.session.page_budget(),
            concurrency
        );

        let mut in_flight: JoinSet<(Url, PageResult)> = JoinSet::new();
        let mut cancelled = false;

        loop {
            if self.stop.is_raised() {
                cancelled = true;
                break;
            }

            self.admit_pending(&mut in_flight, concurrency);

            let joined = tokio::select! {
                joined = in_flight.join_next() => joined,
                _ = self.stop.raised() => {
                    cancelled = true;
                    break;
                }
            };

            // Nothing running and nothing admissible
            let Some(joined) = joined else {
                break;
            };

            match joined {
                Ok((url, result)) => self.handle_result(url, result),
                Err(e) => tracing::error!("Fetch task failed: {}", e),
            }
        }

        if cancelled {
            in_flight.abort_all();
            self.emit(format!(
                "[Stopped] crawl cancelled after {} pages",
                self.session.pages_fetched()
            ));
        }

        self.report.finish(&self.session, cancelled);

        tracing::info!(
            "Crawl finished: {} pages crawled, {} attempts, {:?}",
            self.report.pages_fetched,
            self.report.pages.len(),
            self.report.duration().unwrap_or_default()
        );

        self.report
    }

    /// Pops URLs off the frontier and starts fetches until every slot is busy
    fn admit_pending(
        &mut self,
        in_flight: &mut JoinSet<(Url, PageResult)>,
        concurrency: usize,
    ) {
        while in_flight.len() < concurrency {
            let Some(url) = self.frontier.pop() else {
                return;
            };

            match self.session.admit(&url) {
                Admission::Admitted => {
                    tracing::debug!("Fetching {}", url);
                    let fetcher = self.fetcher.clone();
                    in_flight.spawn(async move {
                        let result = fetcher.fetch(&url).await;
                        (url, result)
                    });
                }
                Admission::AlreadyVisited => {
                    tracing::trace!("Skipping {}: already crawled", url);
                }
                Admission::InFlight => {
                    // Tried again if the running fetch does not count
                    tracing::trace!("Parking {} until its running fetch settles", url);
                    self.parked
                        .entry(url.as_str().to_string())
                        .or_default()
                        .push(url);
                }
                Admission::BudgetReserved => {
                    // Retried once a running fetch settles
                    self.frontier.push(url);
                    return;
                }
                Admission::BudgetExhausted => {
                    tracing::debug!(
                        "Page budget reached, dropping {} queued URLs",
                        self.frontier.len() + 1
                    );
                    self.frontier.clear();
                    return;
                }
            }
        }
    }

    /// Handles the outcome of one fetch
    fn handle_result(&mut self, requested: Url, result: PageResult) {
        match result {
            PageResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            } => {
                tracing::trace!(
                    "{} answered {} {} ({} bytes)",
                    final_url,
                    status_code,
                    content_type,
                    body.len()
                );
                self.handle_page(requested, final_url, body)
            }

            PageResult::Skipped { reason } => {
                self.release(&requested);
                self.emit(format!("[Skip] {} -> {}", requested, reason));
                self.report
                    .record(requested.as_str(), reason.page_state(), Some(reason.to_string()));
            }

            PageResult::NetworkError { kind, error } => {
                self.release(&requested);
                self.emit(format!("[Error] {} -> {}", requested, error));
                self.report
                    .record(requested.as_str(), kind.page_state(), Some(error));
            }
        }
    }

    /// Counts, persists and expands a successfully fetched page
    fn handle_page(&mut self, requested: Url, final_url: Url, body: String) {
        let final_url = normalize_url(final_url.as_str()).unwrap_or_else(|_| requested.clone());

        if !self.session.is_in_scope(&final_url) {
            self.release(&requested);
            self.emit(format!(
                "[Skip] {} -> redirected off-domain to {}",
                requested, final_url
            ));
            self.report.record(
                requested.as_str(),
                PageState::RedirectedOffDomain,
                Some(final_url.to_string()),
            );
            return;
        }

        let counted = self.session.record_fetched(&requested, &final_url);
        // Both URLs are visited now; parked copies would only be dropped later
        self.parked.remove(requested.as_str());
        self.parked.remove(final_url.as_str());

        let Some(count) = counted else {
            if final_url == requested {
                // A redirect from elsewhere counted this page while it was in flight
                tracing::debug!("{} was crawled while in flight", requested);
                return;
            }
            self.emit(format!(
                "[Skip] {} -> already crawled as {}",
                requested, final_url
            ));
            self.report.record(
                requested.as_str(),
                PageState::DuplicateRedirect,
                Some(final_url.to_string()),
            );
            return;
        };

        self.emit(format!("[{}] Crawling: {}", count, requested));
        let redirect_detail = (final_url != requested).then(|| format!("redirected from {}", requested));
        self.report
            .record(final_url.as_str(), PageState::Processed, redirect_detail);

        self.persist(&final_url, &body);

        if self.session.budget_exhausted() {
            tracing::debug!("Page budget reached, not following links from {}", final_url);
            return;
        }

        self.follow_links(&final_url, &body);
    }

    /// Hands the page to the sink; failures are logged and skipped
    fn persist(&mut self, url: &Url, body: &str) {
        let Some(sink) = &self.sink else {
            return;
        };

        match sink.save(url, body) {
            Ok(path) => self.report.saved_files.push(path),
            Err(e) => {
                self.emit(format!("[Error] failed to save {}: {}", url, e));
                self.report.save_failures.push(SaveFailure {
                    url: url.to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    /// Extracts in-scope links and queues them in document order
    fn follow_links(&mut self, page_url: &Url, body: &str) {
        let parsed = parse_html(body, page_url);
        let total = parsed.links.len();

        let links: Vec<Url> = parsed
            .links
            .iter()
            .filter_map(|link| match normalize_url(link) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::debug!("Failed to normalize URL {}: {}", link, e);
                    None
                }
            })
            .filter(|url| self.session.is_in_scope(url))
            .filter(|url| !self.session.is_visited(url))
            .collect();

        tracing::debug!(
            "{} ({}): {} links, {} queued",
            page_url,
            parsed.title.as_deref().unwrap_or("untitled"),
            total,
            links.len()
        );

        self.frontier.push_links(links);
    }

    /// Drops the reservation for `url` and requeues links parked behind it
    fn release(&mut self, url: &Url) {
        self.session.release(url);
        if let Some(waiting) = self.parked.remove(url.as_str()) {
            for url in waiting {
                self.frontier.push(url);
            }
        }
    }

    /// Sends a line to the observer, mirrored into the debug log
    fn emit(&self, line: String) {
        tracing::debug!("{}", line);
        self.observer.on_log(&line);
    }
}
