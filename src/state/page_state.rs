/// Page outcome definitions for a crawl
///
/// Every fetch attempt ends in exactly one of these states.
use std::fmt;

/// Represents how a single fetch attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success =====
    /// Page was fetched, counted and its links followed
    Processed,

    // ===== Unacceptable responses (skips) =====
    /// Page returned HTTP 404 or 410
    DeadLink,

    /// Page returned any other status than 200
    HttpError,

    /// Page Content-Type is not HTML
    ContentMismatch,

    /// Redirects ended on another network location
    RedirectedOffDomain,

    /// Redirects ended on a page that was already crawled
    DuplicateRedirect,

    // ===== Transport errors =====
    /// Connection refused, DNS failure or TLS failure
    Unreachable,

    /// Request exceeded the per-request timeout
    TimedOut,

    /// Any other transport failure (body read, redirect loop, ...)
    Failed,
}

impl PageState {
    /// Returns true if this represents a counted page
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Processed)
    }

    /// Returns true if the page was reachable but intentionally not processed
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Self::DeadLink
                | Self::HttpError
                | Self::ContentMismatch
                | Self::RedirectedOffDomain
                | Self::DuplicateRedirect
        )
    }

    /// Returns true if this represents a transport failure
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Unreachable | Self::TimedOut | Self::Failed)
    }

    /// Stable snake_case label used in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processed => "processed",
            Self::DeadLink => "dead_link",
            Self::HttpError => "http_error",
            Self::ContentMismatch => "content_mismatch",
            Self::RedirectedOffDomain => "redirected_off_domain",
            Self::DuplicateRedirect => "duplicate_redirect",
            Self::Unreachable => "unreachable",
            Self::TimedOut => "timed_out",
            Self::Failed => "failed",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> [Self; 9] {
        [
            Self::Processed,
            Self::DeadLink,
            Self::HttpError,
            Self::ContentMismatch,
            Self::RedirectedOffDomain,
            Self::DuplicateRedirect,
            Self::Unreachable,
            Self::TimedOut,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
