//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlSession`: visited set, page counter and budget of one crawl run
//! - `PageState`: how an individual fetch attempt ended

mod page_state;
mod session;

// Re-export main types
pub use page_state::PageState;
pub use session::{Admission, CrawlSession};
