//! Source fetching
//!
//! The loader only needs "text at URL, or failure". Implementations:
//! - [`HttpFetcher`]: blocking HTTP/HTTPS via reqwest
//! - [`FsFetcher`]: local files and `file://` URLs
//! - [`UrlFetcher`]: picks one of the above by scheme
//! - [`MemoryFetcher`]: in-memory sources, records every request

mod fs;
mod http;
mod memory;

pub use fs::FsFetcher;
pub use http::{HttpFetcher, MAX_CONTENT_SIZE};
pub use memory::MemoryFetcher;

use std::path::PathBuf;
use std::rc::Rc;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors that can occur while fetching a source
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { status: u16, url: String },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Content too large
    #[error("Content too large: {size} bytes (max: {max})")]
    ContentTooLarge { size: u64, max: u64 },

    /// Nothing at this location
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Synchronous "get text at URL or fail"
pub trait Fetch {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for Rc<T> {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_text(url)
    }
}

impl<T: Fetch + ?Sized> Fetch for Box<T> {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch_text(url)
    }
}

/// Scheme-dispatching fetcher
///
/// `http://` and `https://` go over the network; everything else is read
/// from the filesystem relative to the base directory.
pub struct UrlFetcher {
    http: HttpFetcher,
    fs: FsFetcher,
}

impl UrlFetcher {
    /// Create a fetcher resolving relative locations against `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self, FetchError> {
        Ok(Self {
            http: HttpFetcher::new()?,
            fs: FsFetcher::new(base_dir),
        })
    }

    /// Create a fetcher resolving relative locations against the working directory
    pub fn current_dir() -> Result<Self, FetchError> {
        Self::new(std::env::current_dir()?)
    }
}

impl Fetch for UrlFetcher {
    fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        if is_remote(url) {
            self.http.fetch_text(url)
        } else {
            self.fs.fetch_text(url)
        }
    }
}

/// Check if a location is fetched over HTTP
pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Compute SHA-256 checksum of fetched text (hex-encoded)
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
