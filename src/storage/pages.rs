use crate::storage::traits::{PageSink, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// File name used for pages whose path is empty
const INDEX_NAME: &str = "index";

/// Character that replaces every `/` inside a path
const PATH_JOIN: char = '_';

const PAGE_EXTENSION: &str = "html";

/// Writes each page to `<root>/<name>.html`
///
/// Distinct URLs that map to the same name overwrite each other.
#[derive(Debug, Clone)]
pub struct FilePageSink {
    root: PathBuf,
}

impl FilePageSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the path a URL would be saved to
    pub fn path_for(&self, url: &Url) -> PathBuf {
        self.root.join(page_file_name(url))
    }
}

impl PageSink for FilePageSink {
    fn save(&self, url: &Url, body: &str) -> StorageResult<PathBuf> {
        // Created on every save so a directory removed mid-crawl comes back
        fs::create_dir_all(&self.root).map_err(|source| StorageError::CreateDir {
            path: self.root.clone(),
            source,
        })?;

        let path = self.path_for(url);
        fs::write(&path, body.as_bytes()).map_err(|source| StorageError::Write {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Saved {} to {}", url, path.display());
        Ok(path)
    }
}

/// Derives the file name for a page from its URL path
///
/// Leading and trailing slashes are stripped, every remaining slash becomes
/// `_`, and an empty path becomes `index`. Query and fragment are ignored.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_crawler::storage::page_file_name;
///
/// let url = Url::parse("http://example.test/blog/post-1").unwrap();
/// assert_eq!(page_file_name(&url), "blog_post-1.html");
///
/// let url = Url::parse("http://example.test/").unwrap();
/// assert_eq!(page_file_name(&url), "index.html");
/// ```
pub fn page_file_name(url: &Url) -> String {
    let path = url.path().trim_matches('/');
    let stem = if path.is_empty() {
        INDEX_NAME.to_string()
    } else {
        path.replace('/', &PATH_JOIN.to_string())
    };
    format!("{}.{}", stem, PAGE_EXTENSION)
}
