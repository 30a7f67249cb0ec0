//! Output module for progress reporting and crawl summaries
//!
//! This module handles:
//! - The observer interface progress lines are delivered through
//! - The final crawl report
//! - Console and markdown renderings of that report

mod markdown;
mod observer;
mod report;
pub mod stats;

pub use markdown::{format_markdown_report, write_markdown_report};
pub use observer::{CrawlObserver, NullObserver, TracingObserver};
pub use report::{CrawlReport, PageRecord, SaveFailure};
pub use stats::{format_report, print_report};
