//! Storage module for persisting fetched pages
//!
//! This module handles writing page bodies to durable storage:
//! - The `PageSink` trait the crawler writes through
//! - A file-backed sink that derives file names from URL paths

mod pages;
mod traits;

pub use pages::{page_file_name, FilePageSink};
pub use traits::{PageSink, StorageError, StorageResult};
