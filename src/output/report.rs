//! Crawl report types
//!
//! A `CrawlReport` is the final summary handed back to whoever started the
//! crawl. It is built up by the coordinator while the crawl runs.

use crate::state::{CrawlSession, PageState};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one fetch attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// The URL that was requested
    pub url: String,

    /// How the attempt ended
    pub state: PageState,

    /// Status code, content type, error text or redirect target
    pub detail: Option<String>,
}

/// A page that was fetched but could not be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveFailure {
    pub url: String,
    pub error: String,
}

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed_url: String,
    pub domain: String,
    pub page_budget: usize,
    pub pages_fetched: usize,

    /// Counted pages, in the order they were fetched
    pub visited: Vec<String>,

    /// Every fetch attempt, in completion order
    pub pages: Vec<PageRecord>,

    pub saved_files: Vec<PathBuf>,
    pub save_failures: Vec<SaveFailure>,

    /// The crawl was stopped by an external signal
    pub cancelled: bool,

    /// The crawl ended because the page budget was used up
    pub budget_exhausted: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlReport {
    /// Starts an empty report for a session
    pub fn new(session: &CrawlSession) -> Self {
        Self {
            seed_url: session.seed_url().to_string(),
            domain: session.domain().to_string(),
            page_budget: session.page_budget(),
            pages_fetched: 0,
            visited: Vec::new(),
            pages: Vec::new(),
            saved_files: Vec::new(),
            save_failures: Vec::new(),
            cancelled: false,
            budget_exhausted: false,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Adds one fetch attempt
    pub fn record(&mut self, url: &str, state: PageState, detail: Option<String>) {
        if state.is_success() {
            self.visited.push(url.to_string());
        }
        self.pages.push(PageRecord {
            url: url.to_string(),
            state,
            detail,
        });
    }

    /// Closes the report with the session's final counters
    pub fn finish(&mut self, session: &CrawlSession, cancelled: bool) {
        self.pages_fetched = session.pages_fetched();
        self.budget_exhausted = session.budget_exhausted();
        self.cancelled = cancelled;
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration of the crawl, if it has finished
    pub fn duration(&self) -> Option<Duration> {
        self.finished_at
            .and_then(|finished| (finished - self.started_at).to_std().ok())
    }

    /// Number of attempts per state, only states that occurred
    pub fn count_by_state(&self) -> BTreeMap<PageState, usize> {
        let mut counts = BTreeMap::new();
        for page in &self.pages {
            *counts.entry(page.state).or_insert(0) += 1;
        }
        counts
    }

    pub fn error_count(&self) -> usize {
        self.pages.iter().filter(|p| p.state.is_error()).count()
    }

    pub fn skip_count(&self) -> usize {
        self.pages.iter().filter(|p| p.state.is_skipped()).count()
    }

    /// Share of fetch attempts that produced a counted page, in percent
    pub fn success_rate(&self) -> f64 {
        if self.pages.is_empty() {
            return 0.0;
        }
        (self.pages_fetched as f64 / self.pages.len() as f64) * 100.0
    }
}
