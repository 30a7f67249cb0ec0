//! Mutable state of one crawl run
//!
//! A `CrawlSession` is created when a crawl starts and dropped when it ends.
//! It owns the visited set and the page counter; nothing about it outlives
//! the run.

use crate::url::{is_in_scope, network_location, normalize_url};
use crate::{UrlError, UrlResult};
use std::collections::HashSet;
use url::Url;

/// Result of asking the session whether a URL may be fetched now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A budget slot was reserved; the caller must fetch and then report back
    Admitted,
    /// URL was already crawled
    AlreadyVisited,
    /// Another fetch for the same URL is still running
    InFlight,
    /// Every remaining budget slot is reserved by running fetches
    BudgetReserved,
    /// The page budget is used up
    BudgetExhausted,
}

/// Traversal state of a single crawl
#[derive(Debug, Clone)]
pub struct CrawlSession {
    seed_url: Url,
    domain: String,
    visited: HashSet<String>,
    in_flight: HashSet<String>,
    page_budget: usize,
    pages_fetched: usize,
}

impl CrawlSession {
    /// Creates a session for the given seed
    ///
    /// The seed is normalized and its network location becomes the fixed
    /// crawl scope.
    ///
    /// # Example
    ///
    /// ```
    /// use site_crawler::state::CrawlSession;
    ///
    /// let session = CrawlSession::new("http://example.test/#top", 10).unwrap();
    /// assert_eq!(session.domain(), "example.test");
    /// assert_eq!(session.seed_url().as_str(), "http://example.test/");
    /// assert_eq!(session.pages_fetched(), 0);
    /// ```
    pub fn new(seed_url: &str, page_budget: usize) -> UrlResult<Self> {
        let seed_url = normalize_url(seed_url)?;
        let domain = network_location(&seed_url).ok_or(UrlError::MissingDomain)?;

        Ok(Self {
            seed_url,
            domain,
            visited: HashSet::new(),
            in_flight: HashSet::new(),
            page_budget,
            pages_fetched: 0,
        })
    }

    pub fn seed_url(&self) -> &Url {
        &self.seed_url
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn page_budget(&self) -> usize {
        self.page_budget
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url.as_str())
    }

    /// Iterates over every URL marked visited, in no particular order
    pub fn visited(&self) -> impl Iterator<Item = &str> {
        self.visited.iter().map(String::as_str)
    }

    pub fn is_in_scope(&self, url: &Url) -> bool {
        is_in_scope(url, &self.domain)
    }

    /// Returns true once no further page may be fetched
    pub fn budget_exhausted(&self) -> bool {
        self.pages_fetched >= self.page_budget
    }

    /// Decides whether `url` may be fetched and reserves a budget slot if so
    ///
    /// Checked before any I/O. A reservation counts against the budget until
    /// it is settled with [`record_fetched`](Self::record_fetched) or
    /// [`release`](Self::release), so running fetches can never push the
    /// counter past the budget.
    pub fn admit(&mut self, url: &Url) -> Admission {
        if self.budget_exhausted() {
            return Admission::BudgetExhausted;
        }
        if self.visited.contains(url.as_str()) {
            return Admission::AlreadyVisited;
        }
        if self.in_flight.contains(url.as_str()) {
            return Admission::InFlight;
        }
        if self.pages_fetched + self.in_flight.len() >= self.page_budget {
            return Admission::BudgetReserved;
        }

        self.in_flight.insert(url.as_str().to_string());
        Admission::Admitted
    }

    /// Drops the reservation for a fetch that failed or was skipped
    ///
    /// The URL is not marked visited, so it may be attempted again if
    /// another page links to it.
    pub fn release(&mut self, url: &Url) {
        self.in_flight.remove(url.as_str());
    }

    /// Settles a successful fetch of `requested` that ended on `final_url`
    ///
    /// Both URLs are marked visited. Returns the new page count, or `None`
    /// when `final_url` had already been crawled through another URL, in
    /// which case nothing is counted.
    pub fn record_fetched(&mut self, requested: &Url, final_url: &Url) -> Option<usize> {
        self.in_flight.remove(requested.as_str());

        let is_new = self.visited.insert(final_url.as_str().to_string());
        self.visited.insert(requested.as_str().to_string());

        if is_new {
            self.pages_fetched += 1;
            Some(self.pages_fetched)
        } else {
            None
        }
    }
}
