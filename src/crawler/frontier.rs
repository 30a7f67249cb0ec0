//! Work stack of URLs waiting to be visited
//!
//! The frontier is a LIFO stack. Links of a page are pushed in reverse
//! document order, so the first link on a page is the next URL popped and its
//! whole subtree is explored before the page's second link. With a single
//! fetch in flight this reproduces depth-first pre-order traversal without
//! recursion.
//!
//! The frontier does no deduplication; admission is decided by the session
//! when a URL is popped.

use url::Url;

#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<Url>,
}

impl Frontier {
    /// Creates a frontier holding only the seed
    pub fn new(seed: Url) -> Self {
        Self { stack: vec![seed] }
    }

    /// Pushes the links of one page so they pop in document order
    pub fn push_links(&mut self, links: Vec<Url>) {
        self.stack.extend(links.into_iter().rev());
    }

    /// Puts a URL back on top so it is the next one popped
    pub fn push(&mut self, url: Url) {
        self.stack.push(url);
    }

    pub fn pop(&mut self) -> Option<Url> {
        self.stack.pop()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.stack.clear();
    }
}
