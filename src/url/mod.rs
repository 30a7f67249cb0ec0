//! URL handling module for Site-Crawler
//!
//! This module provides URL normalization, network-location extraction and
//! the scope test that keeps a crawl on its seed's host.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{is_in_scope, network_location};
pub use normalize::{normalize_url, with_default_scheme};
