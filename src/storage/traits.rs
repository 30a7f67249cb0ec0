//! Storage traits and error types
//!
//! This module defines the trait interface for page persistence backends and
//! associated error types.

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors that can occur while saving a page
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for page persistence backends
///
/// The crawler hands every successfully fetched page to the sink exactly
/// once. A failed save is reported and skipped; it never stops the crawl.
pub trait PageSink: Send + Sync {
    /// Saves the body of a fetched page
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the page was fetched from
    /// * `body` - The response body, exactly as received
    ///
    /// # Returns
    ///
    /// Where the page was written
    fn save(&self, url: &Url, body: &str) -> StorageResult<PathBuf>;
}
