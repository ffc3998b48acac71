//! In-memory fetcher

use std::cell::RefCell;
use std::collections::HashMap;

use super::{Fetch, FetchError};

/// Serves sources from a map and records every requested URL
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    sources: RefCell<HashMap<String, String>>,
    requests: RefCell<Vec<String>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `source` at `url`
    pub fn insert(&self, url: impl Into<String>, source: impl Into<String>) {
        self.sources.borrow_mut().insert(url.into(), source.into());
    }

    /// Stop serving `url`
    pub fn remove(&self, url: &str) -> Option<String> {
        self.sources.borrow_mut().remove(url)
    }

    /// Every URL requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    /// Number of times `url` was requested
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.borrow().iter().filter(|r| *r == url).count()
    }
}

impl Fetch for MemoryFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        self.requests.borrow_mut().push(url.to_string());
        self.sources
            .borrow()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(url.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MemoryFetcher {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let fetcher = MemoryFetcher::new();
        for (url, source) in iter {
            fetcher.insert(url, source);
        }
        fetcher
    }
}
